pub mod charts;
pub mod commands;
pub mod context;
pub mod dataset;
pub mod display;
pub mod logging;
pub mod render;
pub mod task;
pub mod tui;
pub mod workflow;

#[cfg(test)]
pub mod test_utils;
