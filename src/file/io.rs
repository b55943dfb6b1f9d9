//! Bounded multi-block transfers over a file's block map.
//!
//! A read or write enters with (position, buffer); the loop translates the
//! position into block coordinates, moves one block segment per iteration
//! through the region seam, and advances position/remaining length until the
//! request is drained or a boundary interferes. Writes materialize missing
//! blocks on demand through the allocator and stamp the record's timestamps
//! once per completed call; reads never mutate the record.
//!
//! Failure policy is deliberately asymmetric: capacity exhaustion after
//! progress degrades into a partial byte count, while a caller transfer
//! fault always aborts the whole call with no count. In both cases the
//! record keeps the state the completed segments produced.

use crate::block::alloc::BlockAllocator;
use crate::block::layout::BlockLayout;
use crate::block::region::BlockRegion;
use crate::block::span::split_range_into_blocks;
use crate::error::EngineError;
use crate::file::clock::Clock;
use crate::file::map::FileBlockMap;
use crate::utils::num::NumCastExt;
use tracing::{debug, trace};

/// Read/write engine bound to one volume's region, allocator and clock.
///
/// Holds no per-file state and never locks: each call runs to completion on
/// the calling task, and the `&mut FileBlockMap` borrow on mutating calls is
/// the per-file exclusion token the host holds for the call's duration.
pub struct FileIo<'a, R, A, C> {
    layout: BlockLayout,
    region: &'a R,
    alloc: &'a A,
    clock: &'a C,
}

impl<'a, R, A, C> FileIo<'a, R, A, C>
where
    R: BlockRegion,
    A: BlockAllocator,
    C: Clock,
{
    pub fn new(layout: BlockLayout, region: &'a R, alloc: &'a A, clock: &'a C) -> Self {
        Self {
            layout,
            region,
            alloc,
            clock,
        }
    }

    /// Read up to `buf.len()` bytes at `*pos`, advancing `*pos` over the
    /// bytes transferred.
    ///
    /// Returns `Ok(0)` at or past end of file. The transfer length is
    /// clamped to the file size. A transfer fault aborts the whole call with
    /// no byte count; `*pos` stops at the last completed segment boundary
    /// and is never advanced past the fault point.
    #[tracing::instrument(level = "trace", skip(self, map, buf), fields(len = buf.len()))]
    pub async fn read(
        &self,
        map: &FileBlockMap,
        pos: &mut u64,
        buf: &mut [u8],
    ) -> Result<usize, EngineError> {
        let size = map.size();
        if *pos >= size {
            return Ok(0);
        }
        let want = buf.len().min((size - *pos).as_usize());

        let mut done = 0usize;
        for span in split_range_into_blocks(self.layout, *pos, want) {
            // The size invariant keeps every block below `size` allocated;
            // a missing slot ends the valid data.
            let Some(block_no) = map.block_at(span.block_index) else {
                break;
            };
            let dst = &mut buf[done..done + span.len_in_block as usize];
            self.region
                .copy_out(block_no, span.offset_in_block, dst)
                .await?;
            *pos += span.len_in_block as u64;
            done += span.len_in_block as usize;
        }
        Ok(done)
    }

    /// Write `buf` at `*pos`, materializing blocks on demand and advancing
    /// `*pos` over the bytes transferred.
    ///
    /// Capacity exhaustion with prior progress in the same call returns the
    /// partial count as success; exhaustion before any progress returns
    /// [`EngineError::OutOfSpace`]. A transfer fault aborts immediately with
    /// no byte count even when earlier segments landed; the record keeps the
    /// size those segments reached. Every completed call (including partial
    /// and zero-length ones) stamps mtime/ctime and marks the record dirty.
    #[tracing::instrument(level = "trace", skip(self, map, buf), fields(len = buf.len()))]
    pub async fn write(
        &self,
        map: &mut FileBlockMap,
        pos: &mut u64,
        buf: &[u8],
    ) -> Result<usize, EngineError> {
        let mut written = 0usize;
        for span in split_range_into_blocks(self.layout, *pos, buf.len()) {
            let block_no = match self.ensure_block(map, span.block_index).await {
                Ok(no) => no,
                Err(EngineError::OutOfSpace) if written > 0 => {
                    debug!(written, "write stopped at capacity ceiling");
                    break;
                }
                Err(err) => return Err(err),
            };
            let src = &buf[written..written + span.len_in_block as usize];
            self.region
                .copy_in(block_no, span.offset_in_block, src)
                .await?;
            *pos += span.len_in_block as u64;
            written += span.len_in_block as usize;
            map.grow_size(*pos);
        }
        map.touch(self.clock.now());
        Ok(written)
    }

    /// Set the file's logical size.
    ///
    /// Growth materializes (and zeroes) every block the new size covers so
    /// later reads observe zeroes; shrink only lowers the size and keeps the
    /// owned blocks.
    pub async fn truncate(
        &self,
        map: &mut FileBlockMap,
        new_size: u64,
    ) -> Result<(), EngineError> {
        if new_size > map.size() {
            let last = self.layout.block_index_of(new_size - 1);
            for index in 0..=last {
                self.ensure_block(map, index).await?;
            }
        }
        map.set_size(new_size);
        map.touch(self.clock.now());
        Ok(())
    }

    /// Ensure a physical block backs `block_index`, allocating and zeroing
    /// one when the slot is empty.
    ///
    /// The ceiling is checked before the allocator is consulted, and the
    /// block is fully zeroed before the slot is recorded; a failure at any
    /// step leaves the map without a half-initialized slot.
    async fn ensure_block(
        &self,
        map: &mut FileBlockMap,
        block_index: u64,
    ) -> Result<u32, EngineError> {
        if let Some(block_no) = map.block_at(block_index) {
            return Ok(block_no);
        }
        if block_index >= self.layout.max_blocks as u64 {
            return Err(EngineError::OutOfSpace);
        }
        let block_no = self.alloc.allocate().await?;
        self.region.zero_block(block_no).await?;
        map.insert_block(block_index, block_no);
        trace!(block_index, block_no, "materialized data block");
        Ok(block_no)
    }
}
