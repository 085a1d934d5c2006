use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Library-level constants
pub const APP_NAME: &str = "triage-core";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names a JSON knowledge base file to load instead of the built-in tables
pub const KNOWLEDGE_BASE_ENV: &str = "TRIAGE_KNOWLEDGE_BASE";

/// Log filter directive, `RUST_LOG` syntax
pub const LOG_FILTER_ENV: &str = "TRIAGE_LOG";

/// Knowledge base path from the environment, if set and non-empty.
pub fn knowledge_base_path() -> Option<PathBuf> {
    std::env::var_os(KNOWLEDGE_BASE_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn default_log_filter() -> &'static str {
    "triage_core=info,triage_nlp=info"
}

/// Install a global `fmt` subscriber.
///
/// Filter precedence: explicit argument, then `TRIAGE_LOG`, then the
/// default. Returns false if a subscriber was already installed.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env(LOG_FILTER_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} v{} logging initialized", APP_NAME, APP_VERSION);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_parses() {
        assert!(default_log_filter().parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn second_init_is_rejected() {
        // "off" keeps the process-global subscriber silent for the other tests
        let _first = init_tracing(Some("off"));
        assert!(!init_tracing(Some("off")));
        assert!(!init_tracing(None));
    }
}
