// ABOUTME: Tracing subscriber setup for the host application
// ABOUTME: Compact fmt output filtered by BOOKMARKER_LOG / RUST_LOG, defaulting to info

use tracing_subscriber::EnvFilter;

use crate::Config;

/// Install the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed (tests, embedders
/// that configure their own), which is not treated as an error.
pub fn init_tracing(config: &Config) -> bool {
    let filter = config
        .log_filter
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let config = Config::from_lookup(|_| None).unwrap();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
        tracing::info!("tracing initialised");
    }
}
