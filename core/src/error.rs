//! Error taxonomy for the reader core.
//!
//! Only allocation failure is an error. Table misses are `Option::None`,
//! malformed numbers become string words, and bracket imbalance is reported
//! as a [`SyntaxWarning`](crate::reader::SyntaxWarning) alongside the tree.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmlError {
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("capacity overflow while growing to {requested} {unit}")]
    CapacityOverflow { requested: usize, unit: &'static str },
}

pub type Result<T> = std::result::Result<T, EmlError>;
