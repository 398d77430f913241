use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::timing::clock::parse_timezone;
use crate::timing::schedule::WeekTemplate;

const DEFAULT_DATABASE_PATH: &str = "data.db";
const DEFAULT_TIMEZONE: &str = "Europe/London";

/// Deployment settings, read from a JSON file.
///
/// ```json
/// {
///     "database_path": "data.db",
///     "timezone": "Europe/London",
///     "default_schedule": { "days": [ { "from_time": "09.00", "to_time": "18.00" }, ... ] }
/// }
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub timezone: Tz,
    pub default_schedule: WeekTemplate,
}

#[derive(Deserialize)]
struct RawConfig {
    database_path: Option<PathBuf>,
    timezone: Option<String>,
    default_schedule: Option<WeekTemplate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            timezone: Tz::Europe__London,
            default_schedule: WeekTemplate::default(),
        }
    }
}

impl Config {
    pub fn from_config(config: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(config)?;
        let timezone = parse_timezone(raw.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))?;
        let default_schedule = raw.default_schedule.unwrap_or_default();
        default_schedule.validate()?;
        Ok(Self {
            database_path: raw
                .database_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            timezone,
            default_schedule,
        })
    }

    /// Reads the file at `path`, or falls back to the defaults when there is
    /// no such file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Self::from_config(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::Weekday;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_config("{}").unwrap();
        assert_eq!(config.database_path, PathBuf::from("data.db"));
        assert_eq!(config.timezone, Tz::Europe__London);
        assert_eq!(config.default_schedule, WeekTemplate::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_config(
            r#"{
                "database_path": "/tmp/shops.db",
                "timezone": "Europe/Berlin",
                "default_schedule": {"days": [
                    {"from_time": "08.00", "to_time": "20.00",
                     "breaks": [{"from_time": "13.00", "to_time": "14.00"}]},
                    null, null, null, null, null, null
                ]}
            }"#,
        )
        .unwrap();
        assert_eq!(config.timezone, Tz::Europe__Berlin);
        assert!(config.default_schedule.get(Weekday::Mon).is_some());
        assert!(config.default_schedule.get(Weekday::Tue).is_none());
    }

    #[test]
    fn test_bad_timezone() {
        assert!(matches!(
            Config::from_config(r#"{"timezone": "Nowhere"}"#),
            Err(ConfigError::Timezone(_))
        ));
    }

    #[test]
    fn test_invalid_default_schedule() {
        let result = Config::from_config(
            r#"{"default_schedule": {"days": [
                {"from_time": "08.00", "to_time": "20.00",
                 "breaks": [{"from_time": "21.00", "to_time": "22.00"}]},
                null, null, null, null, null, null
            ]}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Schedule(_))));
    }

    #[test]
    fn test_touching_breaks_in_default_schedule() {
        let result = Config::from_config(
            r#"{"default_schedule": {"days": [
                null, null, null, null, null, null,
                {"from_time": "08.00", "to_time": "20.00",
                 "breaks": [{"from_time": "10.00", "to_time": "10.15"},
                            {"from_time": "10.15", "to_time": "10.30"}]}
            ]}}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::Schedule(ValidationError::UnorderedBreak { index: 1 }))
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Config::from_config("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_and_present_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shop-timeline.json");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.database_path, PathBuf::from("data.db"));

        fs::write(&path, r#"{"timezone": "UTC"}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.timezone, Tz::UTC);
    }
}
