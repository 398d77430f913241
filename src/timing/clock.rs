use chrono::{DateTime, Local};
use chrono_tz::Tz;

use crate::error::ConfigError;

/// The current instant in the deployment's timezone.
pub fn now_in(timezone: Tz) -> DateTime<Tz> {
    Local::now().with_timezone(&timezone)
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse()
        .map_err(|_| ConfigError::Timezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/London").unwrap(), Tz::Europe__London);
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(ConfigError::Timezone(_))
        ));
    }

    #[test]
    fn test_now_in_uses_timezone() {
        let now = now_in(Tz::UTC);
        assert_eq!(now.timezone(), Tz::UTC);
    }
}
