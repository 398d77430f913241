use thiserror::Error;

/// A time of day that could not be read or is out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("Malformed time '{0}', expected HH.MM or HH:MM")]
    Malformed(String),

    #[error("Time out of range: {hour:02}.{minute:02}")]
    OutOfRange { hour: u32, minute: u32 },

    #[error("Malformed fingerprint '{0}'")]
    Fingerprint(String),
}

/// Input rejected before it reaches the schedule compiler or the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("Day of week must be between 0 and 6, got {0}")]
    DayOfWeek(u8),

    #[error("Break {index} must start before it ends")]
    EmptyBreak { index: usize },

    #[error("Break {index} must lie strictly inside the opening hours of the day")]
    BreakOutsideHours { index: usize },

    #[error("Break {index} must start after the previous break ends")]
    UnorderedBreak { index: usize },

    #[error("Malformed break '{0}', expected FROM-TO")]
    MalformedBreak(String),

    #[error("Finish must occur after start")]
    DayOffRange,

    #[error("Title must not be empty")]
    EmptyTitle,
}

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Shop {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not get connection: {0}")]
    Pool(#[from] r2d2::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not deserialize.\n{0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown timezone '{0}'")]
    Timezone(String),

    #[error("Invalid default schedule: {0}")]
    Schedule(#[from] ValidationError),
}
