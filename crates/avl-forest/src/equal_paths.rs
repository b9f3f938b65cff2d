//! Leaf-depth check for arbitrary binary trees.

use crate::types::Node;

/// Whether every leaf under `root` sits at the same depth. An empty tree
/// qualifies.
///
/// The first leaf reached fixes the reference depth; the walk fails on the
/// first leaf that disagrees. Uses an explicit stack, so list-shaped trees of
/// any depth are fine.
pub fn equal_paths<N: Node>(arena: &[N], root: Option<u32>) -> bool {
    let mut leaf_depth: Option<usize> = None;
    let mut stack: Vec<(u32, usize)> = root.map(|r| (r, 0)).into_iter().collect();

    while let Some((node, depth)) = stack.pop() {
        let n = &arena[node as usize];
        let (l, r) = (n.l(), n.r());
        if l.is_none() && r.is_none() {
            match leaf_depth {
                None => leaf_depth = Some(depth),
                Some(d) if d != depth => return false,
                Some(_) => {}
            }
            continue;
        }
        // Right first, so the left subtree is visited first.
        stack.extend(r.map(|r| (r, depth + 1)));
        stack.extend(l.map(|l| (l, depth + 1)));
    }

    true
}
