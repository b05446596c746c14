use tracing_subscriber::EnvFilter;

use super::HortasError;

/// Installs the global fmt subscriber. Fails instead of panicking when a
/// subscriber is already set.
pub fn init_logging(filter: &str) -> Result<(), HortasError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| HortasError::Config(format!("invalid log filter {:?}: {}", filter, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| HortasError::Custom(format!("logging already initialised: {}", e)))
}
