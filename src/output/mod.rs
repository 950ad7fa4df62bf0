//! Report rendering and evaluation records

pub mod report;
pub mod formatter;
pub mod record;

pub use formatter::{ReportGenerator, OutputFormatter};
pub use record::{CsvRecordSink, EvaluationRecord, RecordSink};
pub use report::{EvaluationReport, ScoreBand};
