pub mod formatter;
pub mod report;
