//! The region allocator

use std::cell::Cell;
use std::fmt;

use bumpalo::Bump;

use crate::tree::{TreeNode, NODE_FOOTPRINT};

/// A bulk memory area that owns every node carved from it.
///
/// Nodes come back as shared references tied to the region's lifetime,
/// so releasing the region is the only way to reclaim them and the
/// borrow checker rules out touching a node after its region is gone.
pub struct Region {
    bump: Bump,
    nodes: Cell<u64>,
}

impl Region {
    /// Create an empty region.
    pub fn new() -> Self {
        Self {
            bump: Bump::new(),
            nodes: Cell::new(0),
        }
    }

    /// Create a region with `bytes` of backing memory reserved up front.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bump: Bump::with_capacity(bytes),
            nodes: Cell::new(0),
        }
    }

    /// Carve one node out of the region.
    ///
    /// O(1) amortized. The node cannot be released on its own; it lives
    /// until the whole region does.
    pub fn alloc_node<'r>(
        &'r self,
        left: Option<&'r TreeNode<'r>>,
        right: Option<&'r TreeNode<'r>>,
    ) -> &'r TreeNode<'r> {
        self.nodes.set(self.nodes.get() + 1);
        self.bump.alloc(TreeNode { left, right })
    }

    /// Nodes carved since the region was created.
    pub fn allocated_nodes(&self) -> u64 {
        self.nodes.get()
    }

    /// Bytes carved since the region was created, at the fixed
    /// [`NODE_FOOTPRINT`] per node.
    pub fn allocated_bytes(&self) -> u64 {
        self.nodes.get() * NODE_FOOTPRINT
    }

    /// Release the region, reclaiming every node it owns in one
    /// operation.
    pub fn release(self) {}
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("allocated_nodes", &self.nodes.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_in;

    #[test]
    fn fresh_region_has_no_allocations() {
        let region = Region::new();
        assert_eq!(region.allocated_nodes(), 0);
        assert_eq!(region.allocated_bytes(), 0);
    }

    #[test]
    fn counters_track_every_carved_node() {
        let region = Region::new();
        let root = build_in(4, &region);
        assert_eq!(region.allocated_nodes(), root.count());
        assert_eq!(region.allocated_bytes(), root.count() * NODE_FOOTPRINT);
    }

    #[test]
    fn with_capacity_counts_like_a_fresh_region() {
        let region = Region::with_capacity(1 << 16);
        let root = build_in(3, &region);
        assert_eq!(region.allocated_nodes(), root.count());
        region.release();
    }
}
