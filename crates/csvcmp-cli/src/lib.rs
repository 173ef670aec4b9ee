//! CLI library components for the CSV comparison toolkit.

pub mod logging;
