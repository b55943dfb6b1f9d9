//! Block-plane geometry and collaborator seams.
//!
//! - Fixed-size block partitioning: a file is an ordered run of equally
//!   sized blocks, and a byte offset maps to (block index, within-block
//!   offset) by plain division.
//! - The physical block region and the free-block allocator are external
//!   collaborators reached through the traits defined here; the engine never
//!   tracks free space itself.
//!
//! Submodules:
//! - `layout`: layout parameters and offset translation
//! - `span`: splitting byte ranges into per-block segments
//! - `region`: physical region access and caller-space transfers
//! - `alloc`: free-block allocator seam

pub mod alloc;
pub mod layout;
pub mod region;
pub mod span;

pub use alloc::{BitmapAllocator, BlockAllocator};
pub use layout::{BlockLayout, DEFAULT_BLOCK_SIZE, DEFAULT_MAX_BLOCKS_PER_FILE};
pub use region::{BlockRegion, FileBackedRegion, InMemoryRegion};
pub use span::{BlockSpan, split_range_into_blocks};
