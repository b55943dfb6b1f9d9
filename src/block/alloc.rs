//! Free-block allocator seam.
//!
//! The allocator arbitrates which physical block numbers belong to which
//! file; handing out distinct blocks atomically across files is its job. The
//! engine only consumes the returned numbers and never returns blocks (no
//! reclamation on shrink or delete lives here).

use crate::error::EngineError;
use async_trait::async_trait;
use tokio::sync::Mutex;

#[async_trait]
pub trait BlockAllocator {
    /// Hand out one free physical block number, or
    /// [`EngineError::OutOfSpace`] when the region is exhausted.
    async fn allocate(&self) -> Result<u32, EngineError>;
}

/// First-fit bit-vector allocator over a fixed number of blocks.
pub struct BitmapAllocator {
    bitmap: Mutex<Vec<bool>>,
}

impl BitmapAllocator {
    pub fn new(total_blocks: u32) -> Self {
        Self {
            bitmap: Mutex::new(vec![false; total_blocks as usize]),
        }
    }

    /// Mark the first `reserved` blocks as taken (e.g. superblock and inode
    /// tables) so they are never handed out for file data.
    pub fn with_reserved(total_blocks: u32, reserved: u32) -> Self {
        let mut bitmap = vec![false; total_blocks as usize];
        for slot in bitmap.iter_mut().take(reserved as usize) {
            *slot = true;
        }
        Self {
            bitmap: Mutex::new(bitmap),
        }
    }

    /// Number of blocks still free.
    pub async fn free_blocks(&self) -> u32 {
        let bitmap = self.bitmap.lock().await;
        bitmap.iter().filter(|used| !**used).count() as u32
    }
}

#[async_trait]
impl BlockAllocator for BitmapAllocator {
    async fn allocate(&self) -> Result<u32, EngineError> {
        let mut bitmap = self.bitmap.lock().await;
        match bitmap.iter().position(|used| !used) {
            Some(no) => {
                bitmap[no] = true;
                Ok(no as u32)
            }
            None => Err(EngineError::OutOfSpace),
        }
    }
}
