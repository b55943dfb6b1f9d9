//! Block-mapped file data engine.
//!
//! Each regular file owns an ordered list of fixed-size physical blocks
//! inside a volume's shared block region. This crate translates logical byte
//! offsets into (block, offset) coordinates, drives bounded read/write
//! transfers across block boundaries, materializes zeroed blocks when a
//! write extends the file, and keeps the per-file size/timestamp record
//! consistent for the host filesystem around it.
//!
//! The engine performs no locking and spawns no tasks of its own: mutating
//! entry points take `&mut FileBlockMap`, so the host's exclusive borrow is
//! the per-file serialization token, and every call runs to completion on
//! the calling task.

pub mod block;
pub mod error;
pub mod file;

mod utils;

pub use error::EngineError;
