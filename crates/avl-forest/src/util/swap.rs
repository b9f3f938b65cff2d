use crate::types::Node;

use super::{get_l, get_p, get_r, set_l, set_p, set_r};

/// Exchanges the tree positions of `x` and `y`: each record takes over the
/// other's parent and children, entries stay with their records. Handles the
/// case where one node is a direct child of the other. Returns the new root.
pub fn swap<N: Node>(arena: &mut [N], mut root: u32, x: u32, y: u32) -> u32 {
    if x == y {
        return root;
    }

    let (xp, xl, xr) = (get_p(arena, x), get_l(arena, x), get_r(arena, x));
    let (yp, yl, yr) = (get_p(arena, y), get_l(arena, y), get_r(arena, y));
    // Sides are read up front: for siblings, relinking one clobbers the other.
    let x_left = xp.is_some_and(|p| get_l(arena, p) == Some(x));
    let y_left = yp.is_some_and(|p| get_l(arena, p) == Some(y));

    // x takes y's children.
    adopt(arena, x, y, yl, true);
    adopt(arena, x, y, yr, false);
    // y takes x's children.
    adopt(arena, y, x, xl, true);
    adopt(arena, y, x, xr, false);

    if xp.is_none() {
        root = y;
        set_p(arena, y, None);
    } else if let Some(p) = xp.filter(|&p| p != y) {
        set_p(arena, y, xp);
        set_child(arena, p, x_left, y);
    }

    if yp.is_none() {
        root = x;
        set_p(arena, x, None);
    } else if let Some(p) = yp.filter(|&p| p != x) {
        set_p(arena, x, yp);
        set_child(arena, p, y_left, x);
    }

    root
}

#[inline]
fn set_child<N: Node>(arena: &mut [N], parent: u32, left: bool, child: u32) {
    if left {
        set_l(arena, parent, Some(child));
    } else {
        set_r(arena, parent, Some(child));
    }
}

/// Gives `to` the child slot `child` that `from` held; a link back to `to`
/// itself is turned around to point at `from`.
#[inline]
fn adopt<N: Node>(arena: &mut [N], to: u32, from: u32, child: Option<u32>, left: bool) {
    let child = if child == Some(to) { Some(from) } else { child };
    if left {
        set_l(arena, to, child);
    } else {
        set_r(arena, to, child);
    }
    if let Some(c) = child {
        set_p(arena, c, Some(to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_node::TreeNode;
    use crate::util::{first, insert, next};

    fn build(keys: &[i32]) -> (Vec<TreeNode<i32, ()>>, u32) {
        let mut arena: Vec<TreeNode<i32, ()>> = keys.iter().map(|&k| TreeNode::new(k, ())).collect();
        let mut root = None;
        for i in 0..arena.len() as u32 {
            root = insert(&mut arena, root, i, |n| &n.k, |a, b| a.cmp(b));
        }
        (arena, root.unwrap())
    }

    fn positions(arena: &[TreeNode<i32, ()>], root: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut curr = first(arena, Some(root));
        while let Some(i) = curr {
            out.push(i);
            curr = next(arena, i);
        }
        out
    }

    #[test]
    fn swap_with_direct_left_child() {
        // 4 -> left 2 (no right child).
        let (mut arena, root) = build(&[4, 2, 6, 1]);
        let root = swap(&mut arena, root, 0, 1);
        assert_eq!(root, 1);
        assert_eq!(arena[1].p, None);
        assert_eq!(arena[1].l, Some(0));
        assert_eq!(arena[1].r, Some(2));
        assert_eq!(arena[0].p, Some(1));
        assert_eq!(arena[0].l, Some(3));
        assert_eq!(arena[3].p, Some(0));
        assert_eq!(arena[2].p, Some(1));
        // Records 0 and 1 traded places in the in-order walk.
        assert_eq!(positions(&arena, root), vec![3, 0, 1, 2]);
    }

    #[test]
    fn swap_with_distant_node() {
        let (mut arena, root) = build(&[5, 2, 8, 1, 4, 3]);
        // Predecessor of 5 is 4 (index 4), which has left child 3.
        let root = swap(&mut arena, root, 0, 4);
        assert_eq!(root, 4);
        assert_eq!(arena[4].l, Some(1));
        assert_eq!(arena[4].r, Some(2));
        assert_eq!(arena[1].r, Some(0));
        assert_eq!(arena[0].p, Some(1));
        assert_eq!(arena[0].l, Some(5));
        assert_eq!(arena[5].p, Some(0));
        assert_eq!(arena[0].r, None);
    }

    #[test]
    fn swap_siblings() {
        let (mut arena, root) = build(&[4, 2, 6]);
        let root = swap(&mut arena, root, 1, 2);
        assert_eq!(root, 0);
        assert_eq!(arena[0].l, Some(2));
        assert_eq!(arena[0].r, Some(1));
        assert_eq!(arena[1].p, Some(0));
        assert_eq!(arena[2].p, Some(0));
        assert_eq!(positions(&arena, root), vec![2, 0, 1]);
    }

    #[test]
    fn swap_same_node_is_noop() {
        let (mut arena, root) = build(&[1, 2]);
        assert_eq!(swap(&mut arena, root, 1, 1), root);
        assert_eq!(arena[1].p, Some(0));
    }
}
