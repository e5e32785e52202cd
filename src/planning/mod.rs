pub mod clock;
pub mod window_planner;
