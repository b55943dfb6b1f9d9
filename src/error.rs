//! Engine error taxonomy.
//!
//! Two conditions cover every failure this engine can surface: the caller's
//! buffer could not be transferred, or no data block could be produced.
//! Nothing is retried internally and no error is fatal to the volume; a
//! failed call leaves the file record in the state the completed segments
//! produced.

use std::io::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Caller-space transfer failed: the source or destination buffer could
    /// not be reached.
    #[error("caller buffer transfer fault")]
    Fault,

    /// No physical block available, or the per-file capacity ceiling was
    /// reached.
    #[error("no space left for data blocks")]
    OutOfSpace,
}

impl From<std::io::Error> for EngineError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            ErrorKind::StorageFull | ErrorKind::QuotaExceeded => EngineError::OutOfSpace,
            _ => EngineError::Fault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let full = std::io::Error::new(ErrorKind::StorageFull, "full");
        assert_eq!(EngineError::from(full), EngineError::OutOfSpace);

        let bad = std::io::Error::new(ErrorKind::InvalidInput, "bad");
        assert_eq!(EngineError::from(bad), EngineError::Fault);
    }
}
