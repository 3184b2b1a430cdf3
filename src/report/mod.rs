pub mod sink;

pub use sink::{ReportPaths, ReportSink};
