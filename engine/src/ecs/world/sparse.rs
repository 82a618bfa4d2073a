/// A block-based sparse map from entity slot indices to dense positions.
///
/// The slot space is divided into fixed-size blocks, and memory is only allocated for blocks
/// that hold at least one entry. Within a block a dense vector stores the positions, so lookups
/// are two array indexings with no hashing.
///
/// Entity slots are handed out sequentially and recycled, so ids cluster and most blocks end up
/// dense.
///
/// | Operation  | Time           | Memory                        |
/// |------------|----------------|-------------------------------|
/// | `insert()` | O(1) amortized | Allocates block on first use  |
/// | `get()`    | O(1)           | No allocation                 |
/// | `remove()` | O(1)           | No deallocation (leaves None) |
///
/// # Example
///
/// ```ignore
/// let mut index = SparseIndex::new_with_block_size(4);
/// index.insert(0, 0);
/// index.insert(9, 1);      // Allocates block 2, skipping block 1
///
/// assert_eq!(index.get(9), Some(1));
/// assert_eq!(index.get(5), None);
/// ```
#[derive(Debug, Clone)]
pub struct SparseIndex {
    /// The number of slots per block.
    block_size: usize,

    /// Outer Vec is indexed by `slot / block_size`, inner Vec by `slot % block_size`.
    blocks: Vec<Option<Vec<Option<usize>>>>,
}

impl SparseIndex {
    /// Default block size balances memory usage and access speed for typical entity patterns.
    pub const DEFAULT_BLOCK_SIZE: usize = 256;

    /// Create a new index with the default block size.
    #[inline]
    pub const fn new() -> Self {
        Self::new_with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }

    /// Create a new index with a custom block size.
    ///
    /// Debug builds panic if block_size is 0.
    #[inline]
    pub const fn new_with_block_size(block_size: usize) -> Self {
        debug_assert!(block_size > 0, "block_size must be greater than 0");
        Self {
            block_size,
            blocks: Vec::new(),
        }
    }

    #[inline]
    fn indices(&self, slot: usize) -> (usize, usize) {
        (slot / self.block_size, slot % self.block_size)
    }

    /// Map `slot` to `position`, replacing any previous mapping.
    pub fn insert(&mut self, slot: usize, position: usize) {
        let (block_index, within_block_index) = self.indices(slot);

        if block_index >= self.blocks.len() {
            self.blocks.resize_with(block_index + 1, || None);
        }

        let block = self.blocks[block_index].get_or_insert_with(|| vec![None; self.block_size]);
        block[within_block_index] = Some(position);
    }

    /// Get the position mapped to `slot`.
    pub fn get(&self, slot: usize) -> Option<usize> {
        let (block_index, within_block_index) = self.indices(slot);
        let block = self.blocks.get(block_index)?.as_ref()?;
        block[within_block_index]
    }

    /// Remove and return the position mapped to `slot`.
    pub fn remove(&mut self, slot: usize) -> Option<usize> {
        let (block_index, within_block_index) = self.indices(slot);
        let block = self.blocks.get_mut(block_index)?.as_mut()?;
        block[within_block_index].take()
    }

    /// Get the number of blocks, allocated or not.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get the number of blocks that have been allocated.
    pub fn allocated_block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

impl Default for SparseIndex {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block() {
        // Given
        let mut index = SparseIndex::new_with_block_size(10);

        // When
        index.insert(0, 10);
        index.insert(5, 40);
        index.insert(9, 80);

        // Then
        assert_eq!(index.block_count(), 1);
        assert_eq!(index.get(0), Some(10));
        assert_eq!(index.get(1), None);
        assert_eq!(index.get(5), Some(40));
        assert_eq!(index.get(9), Some(80));
    }

    #[test]
    fn block_skipping() {
        // Given
        let mut index = SparseIndex::new_with_block_size(4);

        // When
        index.insert(0, 10);
        index.insert(9, 80);

        // Then - block 1 is never allocated
        assert_eq!(index.block_count(), 3);
        assert_eq!(index.allocated_block_count(), 2);
        assert_eq!(index.get(5), None);
        assert_eq!(index.get(100), None);
    }

    #[test]
    fn remove_and_replace() {
        // Given
        let mut index = SparseIndex::new_with_block_size(4);
        index.insert(3, 1);

        // When
        index.insert(3, 2);
        let removed = index.remove(3);

        // Then
        assert_eq!(removed, Some(2));
        assert_eq!(index.get(3), None);
        assert_eq!(index.remove(3), None);
        assert_eq!(index.remove(42), None);
    }
}
