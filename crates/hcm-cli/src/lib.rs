//! CLI library components for the HR field mapper.

pub mod config;
pub mod input;
pub mod logging;
