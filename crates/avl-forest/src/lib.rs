//! Arena-based AVL tree.
//!
//! Nodes carry parent, left and right links as `Option<u32>` indices into a
//! `Vec`-backed arena, so fixup walks can climb from a leaf to the root in
//! O(1) per step without raw back-pointers.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`] and [`KvNode`] traits |
//! | [`tree_node`] | [`TreeNode`], plain unbalanced node record |
//! | [`util`] | unbalanced BST primitives: navigation, search, splice, swap, release |
//! | [`avl`] | [`AvlNode`], rotations, insert/remove fixup walks, [`AvlMap`], [`AvlSet`] |
//! | [`equal_paths`] | equal leaf-depth check for any binary tree |
//! | [`error`] | [`Error`] |
//!
//! ```
//! use avl_forest::AvlMap;
//!
//! let mut map = AvlMap::new();
//! for k in [10, 20, 30] {
//!     map.insert(k, k * 2);
//! }
//! assert_eq!(map.key(map.root_index().unwrap()), &20);
//! assert_eq!(map.remove(&20), Some(40));
//! map.assert_valid().unwrap();
//! ```

pub mod avl;
pub mod equal_paths;
pub mod error;
#[path = "TreeNode.rs"]
pub mod tree_node;
pub mod types;
pub mod util;

pub use avl::{AvlMap, AvlNode, AvlNodeLike, AvlSet};
pub use equal_paths::equal_paths;
pub use error::{Error, Result};
pub use tree_node::TreeNode;
pub use types::{KvNode, Node};
