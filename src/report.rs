//! Result-slot report lines

use std::fmt;

use crate::tree::NODE_FOOTPRINT;

/// Which task produced a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The extra-deep tree built once to stress peak allocation.
    Stretch,
    /// A batch of identical trees at one sampled depth.
    Bucket {
        /// Trees built at this depth.
        iterations: u64,
    },
    /// The tree kept alive until every other task has finished.
    LongLived,
}

/// One report line, written exactly once into its result slot and read
/// once when the run emits its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLine {
    /// Task category.
    pub category: Category,
    /// Depth of the trees the task built.
    pub depth: u32,
    /// Regions the task consumed; 1 when the task never replaced its
    /// region or allocated per node.
    pub regions: u64,
    /// Total nodes across every tree the task built.
    pub nodes: u64,
}

impl ReportLine {
    /// Estimated allocation volume in MiB, at the fixed
    /// [`NODE_FOOTPRINT`] per node.
    pub fn megabytes(&self) -> f64 {
        (self.nodes * NODE_FOOTPRINT) as f64 / (1u64 << 20) as f64
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Category::Stretch => write!(f, "   stretch tree of depth ")?,
            Category::Bucket { iterations } => write!(f, " {iterations:>8} trees of depth ")?,
            Category::LongLived => write!(f, "long lived tree of depth ")?,
        }
        write!(
            f,
            "{:<8} regions: {:<6} nodes: {:<10} MB: {:.1}",
            self.depth,
            self.regions,
            self.nodes,
            self.megabytes()
        )
    }
}
