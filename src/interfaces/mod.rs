//! Adapters between the console's workflows and the outside world: CSV files
//! and terminal output.

pub mod csv;
pub mod report;
