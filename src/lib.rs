pub mod config;
pub mod error;
pub mod grading;
pub mod mock;
pub mod output;
pub mod ranking;
pub mod report;
pub mod results;
