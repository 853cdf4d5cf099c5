//! Credential hashing: digest primitives, the per-algorithm managers, the
//! registry selecting a manager by password type, and the standard password
//! string format.

pub mod digest;
pub mod managers;
pub mod registry;
pub mod standard;
