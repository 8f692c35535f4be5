use crate::config::types::{Config, Profile};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use toml::{Table, Value};

/// Loads and parses a configuration file from the given path
///
/// The file is layered over the defaults of its `profile` key, or of
/// `default_profile` when the file names none. Any section or field may be
/// omitted.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
/// * `default_profile` - Profile used when the file has no `profile` key
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use harvest::config::{load_config, Profile};
///
/// let config = load_config(Path::new("harvest.toml"), Profile::Full).unwrap();
/// println!("Attempts per URL: {}", config.attempts());
/// ```
pub fn load_config(path: &Path, default_profile: Profile) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, default_profile)
}

/// Parses configuration text, layering it over profile defaults
pub fn parse_config(content: &str, default_profile: Profile) -> Result<Config, ConfigError> {
    let overlay: Table = toml::from_str(content)?;

    let profile = match overlay.get("profile").and_then(Value::as_str) {
        Some(name) => name.parse()?,
        None => default_profile,
    };

    let mut base = match Value::try_from(Config::for_profile(profile))? {
        Value::Table(table) => table,
        _ => {
            return Err(ConfigError::Validation(
                "profile defaults did not serialize to a table".to_string(),
            ))
        }
    };
    merge_tables(&mut base, overlay);

    let config: Config = Value::Table(base).try_into()?;
    validate(&config)?;

    Ok(config)
}

/// Recursively overlays `overlay` onto `base`
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let Value::Table(overlay_child) = value {
            if let Some(Value::Table(base_child)) = base.get_mut(&key) {
                merge_tables(base_child, overlay_child);
                continue;
            }
            base.insert(key, Value::Table(overlay_child));
        } else {
            base.insert(key, value);
        }
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so separate runs can be matched to the settings they used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(
    path: &Path,
    default_profile: Profile,
) -> Result<(Config, String), ConfigError> {
    let config = load_config(path, default_profile)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoordinationMode, DispatchMode, ExtractMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[fetch]
max-retries = 5
user-agent = "TestAgent/1.0"

[batch]
mode = "barrier"
dispatch = "pool"
workers = 4
queue-capacity = 16
extract = "raw"

[output]
directory = "out"
summary-file = "results.txt"

[serve]
enabled = true
port = 9000
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path(), Profile::Full).unwrap();

        assert_eq!(config.fetch.max_retries, 5);
        assert_eq!(config.fetch.user_agent, "TestAgent/1.0");
        assert_eq!(config.batch.dispatch, DispatchMode::Pool);
        assert_eq!(config.batch.workers, 4);
        assert_eq!(config.batch.extract, ExtractMode::Raw);
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.output.summary_file, "results.txt");
        assert!(config.serve.enabled);
        assert_eq!(config.serve.port, 9000);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[fetch]\nmax-retries = 7\n", Profile::Full).unwrap();

        assert_eq!(config.fetch.max_retries, 7);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.output.summary);
        assert_eq!(config.output.directory, "scrapedHTML");
    }

    #[test]
    fn test_empty_config_is_profile_defaults() {
        let config = parse_config("", Profile::Minimal).unwrap();
        assert_eq!(config.profile, Profile::Minimal);
        assert_eq!(config.fetch.max_retries, 1);
        assert!(!config.output.summary);
    }

    #[test]
    fn test_file_profile_wins_over_default() {
        let config = parse_config("profile = \"titles\"\n", Profile::Full).unwrap();
        assert_eq!(config.profile, Profile::Titles);
        assert_eq!(config.batch.mode, CoordinationMode::Collector);
    }

    #[test]
    fn test_file_overrides_profile_field() {
        let content = "profile = \"minimal\"\n[output]\nsummary = true\n";
        let config = parse_config(content, Profile::Full).unwrap();
        assert_eq!(config.fetch.max_retries, 1);
        assert!(config.output.summary);
    }

    #[test]
    fn test_unknown_profile() {
        let result = parse_config("profile = \"turbo\"\n", Profile::Full);
        assert!(matches!(result, Err(ConfigError::UnknownProfile(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"), Profile::Full);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path(), Profile::Full);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let result = parse_config("[batch]\nmode = \"sometimes\"\n", Profile::Full);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[batch]
dispatch = "pool"
workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path(), Profile::Full);
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
