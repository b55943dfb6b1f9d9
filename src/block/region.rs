//! Physical block region access and caller-space transfers.
//!
//! A mounted volume exposes one contiguous span of fixed-size blocks
//! addressed by physical block number. The engine never allocates or frees
//! blocks through this seam; it only moves bytes through the addresses the
//! allocator hands out, one block segment per transfer.

use crate::error::EngineError;
use crate::utils::zero::ZEROS;
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::{Mutex, RwLock};

/// Byte transfers between caller buffers and a volume's block region.
///
/// Every call stays inside one block: `offset_in_block + len` never exceeds
/// the block size for the segments the transfer loop issues. A transfer that
/// cannot complete surfaces as [`EngineError::Fault`].
#[async_trait]
pub trait BlockRegion {
    /// Copy caller bytes into a block.
    async fn copy_in(
        &self,
        block_no: u32,
        offset_in_block: u32,
        src: &[u8],
    ) -> Result<(), EngineError>;

    /// Copy block bytes out into a caller buffer, filling `dst` entirely.
    async fn copy_out(
        &self,
        block_no: u32,
        offset_in_block: u32,
        dst: &mut [u8],
    ) -> Result<(), EngineError>;

    /// Zero one whole block. Runs before a fresh block is recorded in any
    /// file's map, so stale region contents never reach a reader.
    async fn zero_block(&self, block_no: u32) -> Result<(), EngineError>;
}

/// Contiguous in-memory region for local development and tests.
pub struct InMemoryRegion {
    block_size: u32,
    data: RwLock<Vec<u8>>,
}

impl InMemoryRegion {
    pub fn new(block_size: u32, total_blocks: u32) -> Self {
        Self {
            block_size,
            data: RwLock::new(vec![0u8; block_size as usize * total_blocks as usize]),
        }
    }

    fn range_of(
        &self,
        block_no: u32,
        offset_in_block: u32,
        len: usize,
        total: usize,
    ) -> Result<std::ops::Range<usize>, EngineError> {
        if offset_in_block as usize + len > self.block_size as usize {
            return Err(EngineError::Fault);
        }
        let start = block_no as usize * self.block_size as usize + offset_in_block as usize;
        let end = start.checked_add(len).ok_or(EngineError::Fault)?;
        if end > total {
            return Err(EngineError::Fault);
        }
        Ok(start..end)
    }
}

#[async_trait]
impl BlockRegion for InMemoryRegion {
    async fn copy_in(
        &self,
        block_no: u32,
        offset_in_block: u32,
        src: &[u8],
    ) -> Result<(), EngineError> {
        let mut data = self.data.write().await;
        let total = data.len();
        let range = self.range_of(block_no, offset_in_block, src.len(), total)?;
        data[range].copy_from_slice(src);
        Ok(())
    }

    async fn copy_out(
        &self,
        block_no: u32,
        offset_in_block: u32,
        dst: &mut [u8],
    ) -> Result<(), EngineError> {
        let data = self.data.read().await;
        let range = self.range_of(block_no, offset_in_block, dst.len(), data.len())?;
        dst.copy_from_slice(&data[range]);
        Ok(())
    }

    async fn zero_block(&self, block_no: u32) -> Result<(), EngineError> {
        let mut data = self.data.write().await;
        let total = data.len();
        let range = self.range_of(block_no, 0, self.block_size as usize, total)?;
        data[range].fill(0);
        Ok(())
    }
}

/// Flat-file region: block `n` lives at byte offset `n * block_size`.
///
/// The backing file grows lazily as blocks are written; reads past its
/// current end observe zeroes.
pub struct FileBackedRegion {
    block_size: u32,
    file: Mutex<tokio::fs::File>,
}

impl FileBackedRegion {
    /// Open (or create) the backing file for a volume's data blocks.
    pub async fn open<P: AsRef<Path>>(path: P, block_size: u32) -> Result<Self, EngineError> {
        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;
        Ok(Self {
            block_size,
            file: Mutex::new(file),
        })
    }

    fn byte_offset(&self, block_no: u32, offset_in_block: u32) -> u64 {
        block_no as u64 * self.block_size as u64 + offset_in_block as u64
    }
}

#[async_trait]
impl BlockRegion for FileBackedRegion {
    async fn copy_in(
        &self,
        block_no: u32,
        offset_in_block: u32,
        src: &[u8],
    ) -> Result<(), EngineError> {
        if offset_in_block as usize + src.len() > self.block_size as usize {
            return Err(EngineError::Fault);
        }
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(self.byte_offset(block_no, offset_in_block)))
            .await?;
        file.write_all(src).await?;
        Ok(())
    }

    async fn copy_out(
        &self,
        block_no: u32,
        offset_in_block: u32,
        dst: &mut [u8],
    ) -> Result<(), EngineError> {
        if offset_in_block as usize + dst.len() > self.block_size as usize {
            return Err(EngineError::Fault);
        }
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(self.byte_offset(block_no, offset_in_block)))
            .await?;
        // Short reads past the backing file's end leave the tail zeroed.
        let mut filled = 0usize;
        while filled < dst.len() {
            let n = file.read(&mut dst[filled..]).await?;
            if n == 0 {
                dst[filled..].fill(0);
                break;
            }
            filled += n;
        }
        Ok(())
    }

    async fn zero_block(&self, block_no: u32) -> Result<(), EngineError> {
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(self.byte_offset(block_no, 0)))
            .await?;
        let mut remaining = self.block_size as usize;
        while remaining > 0 {
            let take = remaining.min(ZEROS.len());
            file.write_all(&ZEROS[..take]).await?;
            remaining -= take;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_bounds() {
        let region = InMemoryRegion::new(16, 4);
        // Within one block.
        assert!(region.range_of(1, 4, 8, 64).is_ok());
        // Crossing the block boundary is rejected.
        assert!(region.range_of(1, 12, 8, 64).is_err());
        // Past the region end.
        assert!(region.range_of(4, 0, 16, 64).is_err());
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let region = InMemoryRegion::new(16, 4);
        let data = [7u8; 8];
        region.copy_in(2, 4, &data).await.unwrap();

        let mut out = [0u8; 8];
        region.copy_out(2, 4, &mut out).await.unwrap();
        assert_eq!(out, data);

        region.zero_block(2).await.unwrap();
        region.copy_out(2, 4, &mut out).await.unwrap();
        assert_eq!(out, [0u8; 8]);
    }

    #[tokio::test]
    async fn test_file_backed_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let region = FileBackedRegion::open(tmp.path().join("blocks.img"), 16)
            .await
            .unwrap();

        let data = [9u8; 10];
        region.copy_in(3, 2, &data).await.unwrap();

        let mut out = [0u8; 10];
        region.copy_out(3, 2, &mut out).await.unwrap();
        assert_eq!(out, data);

        // A block never written reads back as zeroes.
        let mut hole = [1u8; 16];
        region.copy_out(7, 0, &mut hole).await.unwrap();
        assert_eq!(hole, [0u8; 16]);
    }

    #[tokio::test]
    async fn test_file_backed_zero_block_scrubs() {
        let tmp = tempfile::tempdir().unwrap();
        let region = FileBackedRegion::open(tmp.path().join("blocks.img"), 16)
            .await
            .unwrap();

        region.copy_in(1, 0, &[5u8; 16]).await.unwrap();
        region.zero_block(1).await.unwrap();

        let mut out = [1u8; 16];
        region.copy_out(1, 0, &mut out).await.unwrap();
        assert_eq!(out, [0u8; 16]);
    }
}
