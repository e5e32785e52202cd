pub mod condition;
pub mod field;
pub mod minute_record;
pub mod snapshot;
pub mod station;
pub mod weather_report;
pub mod window;
