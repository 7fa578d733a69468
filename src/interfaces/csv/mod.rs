pub mod record;
pub mod transaction_reader;
pub mod transaction_writer;
