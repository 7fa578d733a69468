use super::record::TransactionRecord;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use std::io::Write;

/// Writes transactions as CSV rows with a header line.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transactions<'a, I>(&mut self, transactions: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        for tx in transactions {
            self.writer.serialize(TransactionRecord::from(tx))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::seed_transactions;
    use crate::interfaces::csv::transaction_reader::TransactionReader;

    #[test]
    fn test_writer_output() {
        let mut buffer = Vec::new();
        TransactionWriter::new(&mut buffer)
            .write_transactions(&seed_transactions())
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,payment_order,amount,currency,buyer_document,buyer_name,card,card_token,created_at,status,situation,type"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,order-1,100.00,USD,12345678901,John Doe,**** **** **** 1234,,2024-01-01T10:00:00+00:00,APPROVED,PROCESSED,PAYMENT"
        );
    }

    #[test]
    fn test_exported_rows_load_back_without_tokens() {
        let mut buffer = Vec::new();
        TransactionWriter::new(&mut buffer)
            .write_transactions(&seed_transactions())
            .unwrap();

        let loaded: Vec<Transaction> = TransactionReader::new(buffer.as_slice())
            .transactions()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].id, "2");
        assert_eq!(loaded[1].amount, "250.00".parse().unwrap());
        assert!(loaded[1].card_info.token.is_empty());
    }
}
