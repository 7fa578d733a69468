use super::record::TransactionRecord;
use crate::domain::transaction::Transaction;
use crate::error::{ConsoleError, Result};
use std::io::Read;

/// Reads transactions from a CSV source, e.g. a dataset for the mock backend.
///
/// Wraps `csv::Reader` and yields one `Result<Transaction>` per row, so a bad
/// row can be reported and skipped without losing the rest of the file.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes and validates each row.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.reader
            .into_deserialize::<TransactionRecord>()
            .map(|result| result.map_err(ConsoleError::from).and_then(Transaction::try_from))
    }
}
