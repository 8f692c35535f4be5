use crate::config::types::{
    BatchConfig, Config, CoordinationMode, DispatchMode, ExtractMode, FetchConfig, OutputConfig,
    ServeConfig,
};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_batch_config(&config.batch)?;
    validate_output_config(&config.output)?;
    validate_serve_config(&config.serve)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    // max_retries = 0 is accepted and means a single attempt

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates dispatch and coordination settings
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.dispatch == DispatchMode::Pool {
        if config.workers < 1 {
            return Err(ConfigError::Validation(format!(
                "workers must be >= 1 for pool dispatch, got {}",
                config.workers
            )));
        }

        if config.queue_capacity < 1 {
            return Err(ConfigError::Validation(format!(
                "queue_capacity must be >= 1 for pool dispatch, got {}",
                config.queue_capacity
            )));
        }
    }

    // Title records have no file form; they are only delivered over the channel
    if config.mode == CoordinationMode::Barrier && config.extract == ExtractMode::Title {
        return Err(ConfigError::Validation(
            "extract = \"title\" requires mode = \"collector\"".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.summary {
        validate_file_name(&config.summary_file)?;
    }

    Ok(())
}

/// Validates the post-batch server settings
fn validate_serve_config(config: &ServeConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation(
            "serve host cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "serve port must be a fixed port, got 0".to_string(),
        ));
    }

    Ok(())
}

/// The summary file must be a bare name inside the output directory
fn validate_file_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "summary_file cannot be empty".to_string(),
        ));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "summary_file must be a plain file name, got '{}'",
            name
        )));
    }

    Ok(())
}
