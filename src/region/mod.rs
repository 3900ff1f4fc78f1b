//! Region-backed bulk allocation
//!
//! A [`Region`] hands out tree nodes in O(1) amortized time and
//! reclaims all of them in one operation when it is released. Nothing
//! carved from a region can be freed individually; the region is the
//! unit of reclamation.
//!
//! [`RegionCycle`] layers the reuse policy on top: a task keeps one
//! live region and, between trees, swaps it for a fresh one once it has
//! served a configured volume of allocation. The budget is the tunable
//! knob between releasing after every tree (no bulk benefit) and never
//! releasing until the loop ends (unbounded peak memory).

mod allocator;
mod cycle;

pub use allocator::Region;
pub use cycle::RegionCycle;
