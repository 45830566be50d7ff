//! Runtime statistics

pub mod counter;
pub mod report;

pub use counter::EventCounter;
pub use report::{LoopReport, ReportSnapshot};
