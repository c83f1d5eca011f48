use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {source}")]
    Config {
        #[from]
        source: config::ConfigError,
    },
}

/// A reusable configuration loader that combines file-based settings with
/// environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `forexbet.toml`). If no
///    path is provided, it defaults to `"forexbet"`.
/// 2. **Environment Overrides**: Overlays values from environment variables
///    prefixed with `FXBET__`. Nested structures are accessed using double
///    underscores (e.g., `FXBET__API__BASE_URL` maps to `api.base_url`).
///
/// # Errors
/// Returns [`ConfigError`] if the file is missing, the environment variables
/// are malformed, or deserialization into `T` fails.
///
/// # Example
/// ```rust
/// use fxbet_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     base_url: String,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from("forexbet"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder().add_source(File::from(effective_path.as_path()).required(true)).add_source(
        Environment::with_prefix("FXBET")
            .separator("__")
            .convert_case(config::Case::Snake),
    );

    info!("Loading config from {}", effective_path.display());

    let config = builder.build()?.try_deserialize::<T>()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxbet_domain::config::AppConfig;
    use std::io::Write;

    #[test]
    fn loads_file_and_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forexbet.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[api]\nbase_url = \"http://localhost:8093/api\"").unwrap();

        let cfg: AppConfig = load_config(Some(dir.path().join("forexbet"))).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8093/api");
        // Untouched sections fall back to defaults.
        assert_eq!(cfg.lookup.base_url, "https://viacep.com.br");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<AppConfig, _> = load_config(Some(dir.path().join("nope")));
        assert!(result.is_err());
    }
}
