//! Splitting byte ranges into per-block segments.
//!
//! A transfer may start and end mid-block; the splitter cuts the range at
//! block boundaries so the transfer loop can move one block segment at a
//! time.
//!
//! Mapping properties:
//! - The generated [`BlockSpan`] list is monotonic by `block_index`.
//! - Spans never overlap and adjacent spans are contiguous.
//! - The sum of all `len_in_block` equals the requested length.
//! - Each span satisfies `offset_in_block + len_in_block <= block_size`.
//!
//! The splitter is pure arithmetic with no failure mode; it does not consult
//! the capacity ceiling or the file size. Clamping is the transfer loop's
//! job.

use super::layout::BlockLayout;
use crate::utils::num::NumCastExt;

/// Portion of a transfer that resides inside a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub block_index: u64,
    /// Start offset within the block (bytes).
    pub offset_in_block: u32,
    /// Length covered inside the block (bytes).
    pub len_in_block: u32,
}

/// Split `[offset, offset + len)` into block-aligned segments.
pub fn split_range_into_blocks(layout: BlockLayout, offset: u64, len: usize) -> Vec<BlockSpan> {
    if len == 0 {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut remaining = len as u64;
    let mut cursor = offset;

    while remaining > 0 {
        let offset_in_block = layout.within_block_offset(cursor);
        let cap = (layout.block_size - offset_in_block) as u64;
        let take = cap.min(remaining);
        spans.push(BlockSpan {
            block_index: layout.block_index_of(cursor),
            offset_in_block,
            len_in_block: take.as_u32(),
        });
        cursor += take;
        remaining -= take;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_single_block() {
        let layout = BlockLayout::default();
        let spans = split_range_into_blocks(layout, 123, 1024);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].block_index, 0);
        assert_eq!(spans[0].offset_in_block, 123);
        assert_eq!(spans[0].len_in_block, 1024);
    }

    #[test]
    fn test_cross_block_boundary() {
        // 4096-byte blocks, 20 bytes at offset 4090: 6 bytes finish block 0,
        // 14 bytes open block 1.
        let layout = BlockLayout::new(4096, 5);
        let spans = split_range_into_blocks(layout, 4090, 20);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].block_index, 0);
        assert_eq!(spans[0].offset_in_block, 4090);
        assert_eq!(spans[0].len_in_block, 6);
        assert_eq!(spans[1].block_index, 1);
        assert_eq!(spans[1].offset_in_block, 0);
        assert_eq!(spans[1].len_in_block, 14);
    }

    #[test]
    fn test_full_blocks_in_the_middle() {
        let layout = BlockLayout::new(16, 8);
        let spans = split_range_into_blocks(layout, 10, 30);
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans[0],
            BlockSpan {
                block_index: 0,
                offset_in_block: 10,
                len_in_block: 6
            }
        );
        assert_eq!(
            spans[1],
            BlockSpan {
                block_index: 1,
                offset_in_block: 0,
                len_in_block: 16
            }
        );
        assert_eq!(
            spans[2],
            BlockSpan {
                block_index: 2,
                offset_in_block: 0,
                len_in_block: 8
            }
        );
    }

    #[test]
    fn test_exact_alignment() {
        let layout = BlockLayout::new(16, 8);
        let spans = split_range_into_blocks(layout, 16, 16);
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans[0],
            BlockSpan {
                block_index: 1,
                offset_in_block: 0,
                len_in_block: 16
            }
        );
    }

    #[test]
    fn test_zero_len() {
        let layout = BlockLayout::default();
        assert!(split_range_into_blocks(layout, 10, 0).is_empty());
    }

    #[test]
    fn test_lengths_sum_to_request() {
        let layout = BlockLayout::new(512, 64);
        let spans = split_range_into_blocks(layout, 300, 5000);
        let total: u64 = spans.iter().map(|s| s.len_in_block as u64).sum();
        assert_eq!(total, 5000);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].block_index + 1, pair[1].block_index);
            assert_eq!(pair[1].offset_in_block, 0);
        }
    }
}
