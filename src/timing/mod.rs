pub mod clock;
pub mod daily;
pub mod day_off;
pub mod fingerprint;
pub mod schedule;
pub mod time_of_day;
pub mod week_interval;
pub mod working_time;
