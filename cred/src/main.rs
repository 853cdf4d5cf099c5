//! Minimal CLI over the credential library. Commands are small so operators
//! can hash, verify, and inspect stored passwords without the full server.

use std::env;

use casdoor_cred::config::{load_config, RuntimeConfig};
use casdoor_cred::{
    ldap_password, CredentialManager, PasswordType, Salt, StandardPassword, UserCredential,
};
use serde_json::json;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_CLI_LEVEL: &str = "warn";
const CONFIG_COMMANDS: [&str; 3] = ["load-config", "set-password", "check-password"];

fn print_usage() {
    eprintln!("Commands:\n  hash-password <type> <plaintext> [user-salt] [org-salt]\n  verify-password <type> <plaintext> <hash> [user-salt] [org-salt]\n  parse-standard <standard-password>\n  ldap-password <type> <hash>\n  load-config <path>\n  set-password <config> <plaintext>\n  check-password <config> <plaintext> <user-credential-json>");
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_type(name: &str) -> Option<PasswordType> {
    match name.parse::<PasswordType>() {
        Ok(password_type) => Some(password_type),
        Err(err) => {
            error!("{err}");
            None
        }
    }
}

// Config commands install the subscriber only once the configured level is
// known.
fn config_from(path: &str) -> Option<RuntimeConfig> {
    match load_config(path) {
        Ok(config) => {
            init_tracing(&config.log_level);
            Some(config)
        }
        Err(err) => {
            init_tracing(DEFAULT_CLI_LEVEL);
            error!("config load failed: {err}");
            None
        }
    }
}

fn salt_args(args: &[String]) -> (&str, &str) {
    let user = args.first().map(String::as_str).unwrap_or_default();
    let organization = args.get(1).map(String::as_str).unwrap_or_default();
    (user, organization)
}

fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }
    if !CONFIG_COMMANDS.contains(&args[1].as_str()) {
        init_tracing(DEFAULT_CLI_LEVEL);
    }

    match args[1].as_str() {
        "hash-password" => {
            if !(4..=6).contains(&args.len()) {
                return print_usage();
            }
            let Some(password_type) = parse_type(&args[2]) else {
                return;
            };
            let (user, organization) = salt_args(&args[4..]);
            match password_type
                .manager()
                .hash_password(&args[3], &Salt::new(user, organization))
            {
                Ok(hash) => println!("{hash}"),
                Err(err) => error!("hashing failed: {err}"),
            }
        }
        "verify-password" => {
            if !(5..=7).contains(&args.len()) {
                return print_usage();
            }
            let Some(password_type) = parse_type(&args[2]) else {
                return;
            };
            let (user, organization) = salt_args(&args[5..]);
            let matches = password_type.manager().is_password_correct(
                &args[3],
                &args[4],
                &Salt::new(user, organization),
            );
            println!("{}", if matches { "match" } else { "no-match" });
        }
        "parse-standard" => {
            if args.len() != 3 {
                return print_usage();
            }
            match args[2].parse::<StandardPassword>() {
                Ok(standard) => println!("{}", to_pretty(&json!(standard))),
                Err(err) => error!("{err}"),
            }
        }
        "ldap-password" => {
            if args.len() != 4 {
                return print_usage();
            }
            if let Some(password_type) = parse_type(&args[2]) {
                println!("{}", ldap_password(password_type, &args[3]));
            }
        }
        "load-config" => {
            if args.len() != 3 {
                return print_usage();
            }
            if let Some(config) = config_from(&args[2]) {
                let printable = json!({
                    "organization": config.organization.name,
                    "passwordType": config.organization.password_type,
                    "passwordSalt": "<redacted in output>",
                    "argon2": {
                        "memoryKib": config.settings.argon2.m_cost(),
                        "iterations": config.settings.argon2.t_cost(),
                        "parallelism": config.settings.argon2.p_cost(),
                    },
                    "bcryptCost": config.settings.bcrypt_cost,
                    "djangoIterations": config.settings.django_iterations,
                    "logLevel": config.log_level,
                });
                println!("{}", to_pretty(&printable));
            }
        }
        "set-password" => {
            if args.len() != 4 {
                return print_usage();
            }
            let Some(config) = config_from(&args[2]) else {
                return;
            };
            let mut user = UserCredential::default();
            match user.set_password(&config.organization, &config.settings, &args[3]) {
                Ok(()) => println!("{}", to_pretty(&json!(user))),
                Err(err) => error!("{err}"),
            }
        }
        "check-password" => {
            if args.len() != 5 {
                return print_usage();
            }
            let Some(config) = config_from(&args[2]) else {
                return;
            };
            let user: UserCredential = match serde_json::from_str(&args[4]) {
                Ok(user) => user,
                Err(err) => return error!("invalid user credential json: {err}"),
            };
            let matches = user.check_password(&config.organization, &config.settings, &args[3]);
            println!("{}", if matches { "match" } else { "no-match" });
        }
        _ => print_usage(),
    }
}
