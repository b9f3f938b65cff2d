//! Node trait definitions.
//!
//! Every "pointer" is an `Option<u32>` index into a caller-owned arena
//! (`Vec<N>` or `[N]`). Parent links are navigation only: a node is owned by
//! the arena, and reachable through exactly one child link of its parent (or
//! through the tree root).

/// Tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Key/value node interface used by map-like structures.
pub trait KvNode<K, V>: Node {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
    fn value_mut(&mut self) -> &mut V;
}
