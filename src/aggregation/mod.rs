pub mod aggregator;
pub mod derived;
pub mod error;
pub mod reducers;
