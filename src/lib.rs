pub mod error;
pub mod parser;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use error::CriticalFailure;
pub use report::{escalate, report_results};
pub use runner::run_tests;
pub use utils::config::Config;
