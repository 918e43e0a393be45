//! Layered settings: built-in defaults, an optional TOML file, then
//! `PIPEWATCH_*` environment variables. Command-line overrides are applied
//! on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::ui::ThemeChoice;

/// Prefix for environment overrides, e.g. `PIPEWATCH_TIME_SCALE=500ms`.
pub const ENV_PREFIX: &str = "PIPEWATCH";

const DEFAULT_TIME_SCALE: &str = "1s";

/// Frames drawn per time-scale period.
const FRAMES_PER_PERIOD: u32 = 4;

#[derive(Debug, Deserialize)]
struct RawSettings {
    time_scale: String,
    theme: ThemeChoice,
    #[serde(default)]
    log_file: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base period of the refresh loop.
    pub time_scale: Duration,
    pub theme: ThemeChoice,
    /// Where log output goes. No logging without it.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale: Duration::from_secs(1),
            theme: ThemeChoice::Auto,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from the optional TOML file and the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Load settings, reading environment overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("time_scale", DEFAULT_TIME_SCALE)?
            .set_default("theme", "auto")?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let raw: RawSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        let settings = Self {
            time_scale: parse_duration(&raw.time_scale)
                .with_context(|| format!("Invalid time_scale: {}", raw.time_scale))?,
            theme: raw.theme,
            log_file: raw.log_file,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the time scale with a duration string from the command line.
    pub fn set_time_scale(&mut self, value: &str) -> Result<()> {
        self.time_scale =
            parse_duration(value).with_context(|| format!("Invalid time scale: {}", value))?;
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.time_scale.is_zero() {
            bail!("time_scale must be greater than zero");
        }
        Ok(())
    }

    /// Sleep between loop iterations.
    pub fn frame_interval(&self) -> Duration {
        self.time_scale / FRAMES_PER_PERIOD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn defaults() {
        let settings = Settings::load_with_env(None, no_env()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.frame_interval(), Duration::from_millis(250));
    }

    #[test]
    fn file_overrides_defaults() {
        let file = toml_file(
            "time_scale = \"400ms\"\ntheme = \"light\"\nlog_file = \"/tmp/pw.log\"\n",
        );
        let settings = Settings::load_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(settings.time_scale, Duration::from_millis(400));
        assert_eq!(settings.frame_interval(), Duration::from_millis(100));
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/pw.log")));
    }

    #[test]
    fn env_overrides_file() {
        let file = toml_file("time_scale = \"400ms\"\n");
        let mut env = Map::new();
        env.insert("PIPEWATCH_TIME_SCALE".to_string(), "2s".to_string());
        env.insert("PIPEWATCH_THEME".to_string(), "dark".to_string());

        let settings = Settings::load_with_env(Some(file.path()), Some(env)).unwrap();
        assert_eq!(settings.time_scale, Duration::from_secs(2));
        assert_eq!(settings.theme, ThemeChoice::Dark);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/pipewatch.toml");
        assert!(Settings::load_with_env(Some(path), no_env()).is_err());
    }

    #[test]
    fn rejects_bad_time_scale() {
        let file = toml_file("time_scale = \"soon\"\n");
        assert!(Settings::load_with_env(Some(file.path()), no_env()).is_err());

        let file = toml_file("time_scale = \"0s\"\n");
        assert!(Settings::load_with_env(Some(file.path()), no_env()).is_err());
    }

    #[test]
    fn cli_time_scale_override() {
        let mut settings = Settings::default();
        settings.set_time_scale("800ms").unwrap();
        assert_eq!(settings.frame_interval(), Duration::from_millis(200));
        assert!(settings.set_time_scale("0ms").is_err());
    }
}
