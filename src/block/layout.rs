//! Block layout and offset translation.

/// Default block size (4 KiB).
pub const DEFAULT_BLOCK_SIZE: u32 = 4096;
/// Default capacity ceiling: number of blocks a single file may own.
pub const DEFAULT_MAX_BLOCKS_PER_FILE: u32 = 5;

/// Layout parameters for a volume's data blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub block_size: u32,
    pub max_blocks: u32,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_blocks: DEFAULT_MAX_BLOCKS_PER_FILE,
        }
    }
}

impl BlockLayout {
    pub fn new(block_size: u32, max_blocks: u32) -> Self {
        debug_assert!(block_size > 0 && max_blocks > 0);
        Self {
            block_size,
            max_blocks,
        }
    }

    /// Degenerate configuration: every file owns at most one block.
    pub fn single_block(block_size: u32) -> Self {
        Self::new(block_size, 1)
    }

    /// Zero-based logical block index for a file offset.
    #[inline]
    pub fn block_index_of(&self, offset: u64) -> u64 {
        offset / self.block_size as u64
    }

    /// Byte offset within the block holding a file offset.
    #[inline]
    pub fn within_block_offset(&self, offset: u64) -> u32 {
        (offset % self.block_size as u64) as u32
    }

    /// Total byte capacity a single file may reach.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.max_blocks as u64 * self.block_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_translation() {
        let layout = BlockLayout::default();
        let bs = layout.block_size as u64;

        assert_eq!(layout.block_index_of(0), 0);
        assert_eq!(layout.within_block_offset(0), 0);

        let off = bs + (bs / 2);
        assert_eq!(layout.block_index_of(off), 1);
        assert_eq!(layout.within_block_offset(off), (bs / 2) as u32);

        assert_eq!(layout.block_index_of(bs - 1), 0);
        assert_eq!(layout.block_index_of(bs), 1);
    }

    #[test]
    fn test_capacity() {
        let layout = BlockLayout::new(4096, 5);
        assert_eq!(layout.capacity(), 5 * 4096);

        let single = BlockLayout::single_block(4096);
        assert_eq!(single.max_blocks, 1);
        assert_eq!(single.capacity(), 4096);
    }
}
