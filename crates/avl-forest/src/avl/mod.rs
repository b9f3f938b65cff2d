//! AVL tree: node record, rebalancing walks, and the owning map/set types.

#[path = "AvlMap.rs"]
pub mod avl_map;
#[path = "AvlSet.rs"]
pub mod avl_set;
#[cfg(feature = "serde")]
mod serde_impl;
pub mod types;
pub mod util;

pub use avl_map::{AvlMap, Iter};
pub use avl_set::AvlSet;
pub use types::{AvlNode, AvlNodeLike};
pub use util::{assert_avl_tree, print, remove, rotate_left, rotate_right};
