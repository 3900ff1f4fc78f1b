//! Complete binary trees under two allocation disciplines
//!
//! The benchmark builds the same tree shape two ways: carved out of a
//! [`Region`](crate::region::Region) and released wholesale, or boxed
//! node by node and freed individually on drop. [`build`] picks the
//! discipline from its optional region argument so callers can swap one
//! discipline for the other without touching anything else.

mod node;

pub use node::{build, build_boxed, build_in, BoxedNode, Tree, TreeNode, NODE_FOOTPRINT};
