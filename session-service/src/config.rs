use sentry::types::Dsn;
use std::{env::var, time::Duration};
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub api_base_url: String,
    pub assignment_id: Uuid,
    pub autosave_interval: Duration,
    pub environment: Environment,
    pub request_timeout: Option<Duration>,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl EnvVars {
    pub fn new() -> Self {
        let Ok(api_base_url) = var("API_BASE_URL") else {
            error!("API_BASE_URL not set");
            panic!("API_BASE_URL required");
        };
        assert!(!api_base_url.is_empty(), "API_BASE_URL must not be empty");

        let assignment_id = match var("ASSIGNMENT_ID") {
            Ok(v) => match v.parse::<Uuid>() {
                Ok(id) => id,
                Err(e) => {
                    panic!("ASSIGNMENT_ID is not a valid UUID: {:?}", e);
                }
            },
            Err(_e) => {
                error!("ASSIGNMENT_ID not set");
                panic!("ASSIGNMENT_ID required");
            }
        };

        let autosave_interval = match var("AUTOSAVE_INTERVAL_IN_S") {
            Ok(v) => {
                let seconds: u64 = match v.parse() {
                    Ok(s) => s,
                    Err(e) => {
                        panic!(
                            "AUTOSAVE_INTERVAL_IN_S is not a valid whole number of seconds: {:?}",
                            e
                        );
                    }
                };
                assert!(seconds > 0, "AUTOSAVE_INTERVAL_IN_S must be > 0");
                Duration::from_secs(seconds)
            }
            Err(_e) => Duration::from_secs(60),
        };

        // Optional timeout (in seconds) for each HTTP request.
        // If REQUEST_TIMEOUT_IN_S is not set or invalid, proceed without a timeout.
        let request_timeout = match var("REQUEST_TIMEOUT_IN_S") {
            Ok(val) => match val.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                Ok(_) => {
                    warn!("REQUEST_TIMEOUT_IN_S provided but not > 0; ignoring");
                    None
                }
                Err(e) => {
                    warn!("Failed to parse REQUEST_TIMEOUT_IN_S ('{val}'): {e}; ignoring");
                    None
                }
            },
            Err(_) => None,
        };

        let environment = match var("ENVIRONMENT") {
            Ok(v) => v.into(),
            Err(_e) => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        let sentry_dsn = match var("SENTRY_DSN") {
            Ok(dsn_string) => {
                assert!(
                    valid_sentry_dsn(&dsn_string),
                    "SENTRY_DSN is not valid DSN."
                );
                Some(dsn_string)
            }
            Err(_e) => {
                if cfg!(not(debug_assertions)) {
                    panic!("SENTRY_DSN is not allowed to be unset outside of a debug build");
                }
                warn!("SENTRY_DSN not set.");
                None
            }
        };

        Self {
            api_base_url,
            assignment_id,
            autosave_interval,
            environment,
            request_timeout,
            sentry_dsn,
        }
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
