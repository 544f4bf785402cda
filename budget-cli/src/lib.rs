//! Command-line front end for the budget calculations.

pub mod app;
pub mod logging;
pub mod report;
pub mod utils;

pub use app::{Dashboard, build_dashboard, load_dashboard};
