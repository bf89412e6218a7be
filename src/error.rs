use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("cannot delete a record: the ledger is empty")]
    EmptyLedger,
    #[error("bad timestamp on line {line}: {text:?}")]
    MalformedTimestamp { line: usize, text: String },
    #[error("bad {field} value on line {line}: {text:?}")]
    MalformedNumber {
        line: usize,
        field: &'static str,
        text: String,
    },
}
