//! AVL rebalancing over an arena of [`AvlNodeLike`] records.
//!
//! Balance factors are `height(right) - height(left)`. Rotations are purely
//! structural; the walks below own every balance update.
//!
//! - Insert: the fixup walk climbs from the new leaf and stops at the first
//!   ancestor that absorbs the height change, doing at most one (single or
//!   double) rotation.
//! - Remove: the fixup walk may rotate at every ancestor up to the root,
//!   since each rotation can shrink the subtree it is applied to.

use std::cmp::Ordering;
use std::fmt::Debug;

use tracing::trace;

use crate::error::{Error, Result};
use crate::types::Node;
use crate::util::{self, get_l, get_p, get_r, replace_child, set_l, set_p, set_r};

use super::types::AvlNodeLike;

#[inline]
fn bf<K, V, N>(arena: &[N], i: u32) -> i8
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].bf()
}

#[inline]
fn set_bf<K, V, N>(arena: &mut [N], i: u32, v: i8)
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].set_bf(v);
}

/// Diff to apply to `parent` once the subtree rooted at `child` has lost one
/// level of height.
#[inline]
fn shrink_diff<N: Node>(arena: &[N], parent: Option<u32>, child: u32) -> i8 {
    match parent {
        Some(p) if get_l(arena, p) == Some(child) => 1,
        _ => -1,
    }
}

/// Single left rotation around `x`: its right child `y` takes `x`'s place
/// and `x` becomes `y`'s left child. Balance factors are left untouched.
///
/// Panics if `x` has no right child. Returns the new root.
pub fn rotate_left<N: Node>(arena: &mut [N], root: u32, x: u32) -> u32 {
    let y = get_r(arena, x).expect("rotate_left pivot has a right child");
    let yl = get_l(arena, y);
    set_r(arena, x, yl);
    if let Some(yl) = yl {
        set_p(arena, yl, Some(x));
    }
    let xp = get_p(arena, x);
    set_p(arena, y, xp);
    replace_child(arena, xp, x, Some(y));
    set_l(arena, y, Some(x));
    set_p(arena, x, Some(y));
    trace!(node = x, pivot = y, "rotate left");
    if xp.is_none() {
        y
    } else {
        root
    }
}

/// Mirror of [`rotate_left`]: the left child of `x` takes its place.
///
/// Panics if `x` has no left child. Returns the new root.
pub fn rotate_right<N: Node>(arena: &mut [N], root: u32, x: u32) -> u32 {
    let y = get_l(arena, x).expect("rotate_right pivot has a left child");
    let yr = get_r(arena, y);
    set_l(arena, x, yr);
    if let Some(yr) = yr {
        set_p(arena, yr, Some(x));
    }
    let xp = get_p(arena, x);
    set_p(arena, y, xp);
    replace_child(arena, xp, x, Some(y));
    set_r(arena, y, Some(x));
    set_p(arena, x, Some(y));
    trace!(node = x, pivot = y, "rotate right");
    if xp.is_none() {
        y
    } else {
        root
    }
}

/// Balance fix after a double rotation. `child` is the new subtree root,
/// `left` and `right` are the nodes now hanging off it. Reads `child`'s
/// balance from before the rotation, which rotations never touch.
pub fn fix_double_rotation_balances<K, V, N>(arena: &mut [N], child: u32, left: u32, right: u32)
where
    N: AvlNodeLike<K, V>,
{
    let (lb, rb) = match bf(arena, child).cmp(&0) {
        Ordering::Less => (0, 1),
        Ordering::Greater => (-1, 0),
        Ordering::Equal => (0, 0),
    };
    set_bf(arena, left, lb);
    set_bf(arena, right, rb);
    set_bf(arena, child, 0);
}

/// Exchanges the tree positions of `x` and `y` along with their balance
/// factors, so each position keeps the balance it had. Returns the new root.
pub fn swap_nodes<K, V, N>(arena: &mut [N], root: u32, x: u32, y: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let root = util::swap(arena, root, x, y);
    let (xb, yb) = (bf(arena, x), bf(arena, y));
    set_bf(arena, x, yb);
    set_bf(arena, y, xb);
    root
}

/// Links `n` as the (empty) left child of `p` and rebalances. Returns the
/// new root.
pub fn insert_left<K, V, N>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    debug_assert!(get_l(arena, p).is_none(), "left slot of {p} is taken");
    util::insert_left(arena, n, p);
    rebalance_insert(arena, root, n)
}

/// Links `n` as the (empty) right child of `p` and rebalances. Returns the
/// new root.
pub fn insert_right<K, V, N>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    debug_assert!(get_r(arena, p).is_none(), "right slot of {p} is taken");
    util::insert_right(arena, n, p);
    rebalance_insert(arena, root, n)
}

/// Insert fixup walk, starting at the parent of the freshly linked leaf
/// `node`. Returns the new root.
pub fn rebalance_insert<K, V, N>(arena: &mut [N], mut root: u32, node: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let mut current = node;
    while let Some(parent) = get_p(arena, current) {
        let diff = if get_l(arena, parent) == Some(current) { -1 } else { 1 };
        arena[parent as usize].update_bf(diff);

        match bf(arena, parent) {
            0 => break,
            -1 | 1 => current = parent,
            -2 => {
                if bf(arena, current) <= 0 {
                    root = rotate_right(arena, root, parent);
                    set_bf(arena, parent, 0);
                    set_bf(arena, current, 0);
                } else {
                    let child = get_r(arena, current).expect("left-right pivot exists");
                    root = rotate_left(arena, root, current);
                    root = rotate_right(arena, root, parent);
                    fix_double_rotation_balances(arena, child, current, parent);
                }
                break;
            }
            2 => {
                if bf(arena, current) >= 0 {
                    root = rotate_left(arena, root, parent);
                    set_bf(arena, parent, 0);
                    set_bf(arena, current, 0);
                } else {
                    let child = get_l(arena, current).expect("right-left pivot exists");
                    root = rotate_right(arena, root, current);
                    root = rotate_left(arena, root, parent);
                    fix_double_rotation_balances(arena, child, parent, current);
                }
                break;
            }
            b => unreachable!("balance factor {b} at node {parent} after insert"),
        }
    }
    trace!(node, stop = current, "insert fixup done");
    root
}

/// Removes `node` from the tree. A node with two children first trades
/// places with its in-order predecessor, so the node actually spliced out
/// has at most one child. On return `node` is fully unlinked and ready to be
/// released. Returns the new root.
pub fn remove<K, V, N>(arena: &mut [N], mut root: u32, node: u32) -> Option<u32>
where
    N: AvlNodeLike<K, V>,
{
    if let (Some(l), Some(_)) = (get_l(arena, node), get_r(arena, node)) {
        let pred = util::last(arena, Some(l)).unwrap_or(l);
        root = swap_nodes(arena, root, node, pred);
    }

    let parent = get_p(arena, node);
    let removed_left = parent.is_some_and(|p| get_l(arena, p) == Some(node));
    let root = util::splice(arena, Some(root), node);
    match (parent, root) {
        (Some(p), Some(root)) => Some(rebalance_remove(arena, root, p, removed_left)),
        _ => root,
    }
}

/// Remove fixup walk, starting at `node`, the former parent of the spliced
/// node. `removed_left` tells which of its subtrees shrank. Returns the new
/// root.
pub fn rebalance_remove<K, V, N>(arena: &mut [N], mut root: u32, node: u32, removed_left: bool) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let mut current = Some(node);
    let mut diff: i8 = if removed_left { 1 } else { -1 };

    while let Some(n) = current {
        arena[n as usize].update_bf(diff);

        match bf(arena, n) {
            -1 | 1 => break,
            0 => {
                let parent = get_p(arena, n);
                diff = shrink_diff(arena, parent, n);
                current = parent;
            }
            -2 => {
                let left = get_l(arena, n).expect("left-heavy node has a left child");
                let left_bf = bf(arena, left);
                if left_bf <= 0 {
                    root = rotate_right(arena, root, n);
                    if left_bf == 0 {
                        set_bf(arena, n, -1);
                        set_bf(arena, left, 1);
                        break;
                    }
                    set_bf(arena, n, 0);
                    set_bf(arena, left, 0);
                    current = get_p(arena, left);
                    diff = shrink_diff(arena, current, left);
                } else {
                    let lr = get_r(arena, left).expect("left-right pivot exists");
                    root = rotate_left(arena, root, left);
                    root = rotate_right(arena, root, n);
                    fix_double_rotation_balances(arena, lr, left, n);
                    current = get_p(arena, lr);
                    diff = shrink_diff(arena, current, lr);
                }
            }
            2 => {
                let right = get_r(arena, n).expect("right-heavy node has a right child");
                let right_bf = bf(arena, right);
                if right_bf >= 0 {
                    root = rotate_left(arena, root, n);
                    if right_bf == 0 {
                        set_bf(arena, n, 1);
                        set_bf(arena, right, -1);
                        break;
                    }
                    set_bf(arena, n, 0);
                    set_bf(arena, right, 0);
                    current = get_p(arena, right);
                    diff = shrink_diff(arena, current, right);
                } else {
                    let rl = get_l(arena, right).expect("right-left pivot exists");
                    root = rotate_right(arena, root, right);
                    root = rotate_left(arena, root, n);
                    fix_double_rotation_balances(arena, rl, n, right);
                    current = get_p(arena, rl);
                    diff = shrink_diff(arena, current, rl);
                }
            }
            b => unreachable!("balance factor {b} at node {n} after remove"),
        }
    }
    trace!(node, stop = ?current, "remove fixup done");
    root
}

/// Checks links, balance factors, and key order of the tree at `root`.
pub fn assert_avl_tree<K, V, N, C>(arena: &[N], root: Option<u32>, comparator: &C) -> Result<()>
where
    N: AvlNodeLike<K, V>,
    C: Fn(&K, &K) -> Ordering,
{
    let Some(root) = root else {
        return Ok(());
    };

    if get_p(arena, root).is_some() {
        return Err(Error::invariant(root, "root has a parent"));
    }

    fn validate<K, V, N>(arena: &[N], node: u32) -> Result<i32>
    where
        N: AvlNodeLike<K, V>,
    {
        let mut heights = [0i32; 2];
        for (slot, child) in [get_l(arena, node), get_r(arena, node)].into_iter().enumerate() {
            if let Some(c) = child {
                if get_p(arena, c) != Some(node) {
                    return Err(Error::invariant(c, "broken parent link"));
                }
                heights[slot] = validate::<K, V, N>(arena, c)?;
            }
        }

        let expected = heights[1] - heights[0];
        let actual = i32::from(arena[node as usize].bf());
        if actual != expected {
            return Err(Error::invariant(
                node,
                format!("balance factor mismatch: expected {expected}, got {actual}"),
            ));
        }
        if !(-1..=1).contains(&actual) {
            return Err(Error::invariant(node, format!("balance factor {actual} out of range")));
        }
        Ok(1 + heights[0].max(heights[1]))
    }

    validate::<K, V, N>(arena, root)?;

    let mut prev: Option<u32> = None;
    let mut curr = util::first(arena, Some(root));
    while let Some(i) = curr {
        if let Some(prev) = prev {
            if comparator(arena[prev as usize].key(), arena[i as usize].key()) != Ordering::Less {
                return Err(Error::invariant(i, "key order violated"));
            }
        }
        prev = Some(i);
        curr = util::next(arena, i);
    }

    Ok(())
}

/// Debug printer for AVL trees.
pub fn print<K, V, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
    N: AvlNodeLike<K, V>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print::<K, V, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<K, V, N>(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [bf={}] {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.bf(),
                n.key(),
                n.value()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::types::AvlNode;

    type Arena = Vec<AvlNode<i32, ()>>;

    fn add(arena: &mut Arena, root: Option<u32>, key: i32) -> u32 {
        arena.push(AvlNode::new(key, ()));
        let n = (arena.len() - 1) as u32;
        let Some(root) = root else {
            return n;
        };
        let mut curr = root;
        loop {
            if key < arena[curr as usize].k {
                match arena[curr as usize].l {
                    Some(l) => curr = l,
                    None => return insert_left(arena, root, n, curr),
                }
            } else {
                match arena[curr as usize].r {
                    Some(r) => curr = r,
                    None => return insert_right(arena, root, n, curr),
                }
            }
        }
    }

    fn build(keys: &[i32]) -> (Arena, u32) {
        let mut arena = Arena::new();
        let mut root = None;
        for &k in keys {
            root = Some(add(&mut arena, root, k));
        }
        let root = root.unwrap();
        assert_avl_tree(&arena, Some(root), &i32::cmp).unwrap();
        (arena, root)
    }

    fn idx(arena: &Arena, key: i32) -> u32 {
        arena.iter().position(|n| n.k == key).unwrap() as u32
    }

    /// `(key, bf)` of `node` and its direct children.
    fn shape(arena: &Arena, node: u32) -> [(Option<i32>, i8); 3] {
        let at = |i: Option<u32>| i.map_or((None, 0), |i| (Some(arena[i as usize].k), arena[i as usize].bf));
        let n = &arena[node as usize];
        [at(Some(node)), at(n.l), at(n.r)]
    }

    #[test]
    fn rotate_left_relinks_inner_subtree() {
        let mut arena: Arena = [1, 2, 3, 4].iter().map(|&k| AvlNode::new(k, ())).collect();
        // 1 -> r 3 -> (l 2, r 4)
        arena[0].r = Some(2);
        arena[2].p = Some(0);
        arena[2].l = Some(1);
        arena[1].p = Some(2);
        arena[2].r = Some(3);
        arena[3].p = Some(2);
        arena[0].bf = 7; // rotations do not look at balances

        let root = rotate_left(&mut arena, 0, 0);
        assert_eq!(root, 2);
        assert_eq!(arena[2].p, None);
        assert_eq!(arena[2].l, Some(0));
        assert_eq!(arena[0].p, Some(2));
        assert_eq!(arena[0].r, Some(1));
        assert_eq!(arena[1].p, Some(0));
        assert_eq!(arena[0].bf, 7);

        let root = rotate_right(&mut arena, root, 2);
        assert_eq!(root, 0);
        assert_eq!(arena[0].r, Some(2));
        assert_eq!(arena[2].l, Some(1));
        assert_eq!(arena[1].p, Some(2));
    }

    #[test]
    fn rotate_below_root_keeps_root() {
        let (mut arena, root) = build(&[2, 1, 3, 4]);
        let three = idx(&arena, 3);
        let new_root = rotate_left(&mut arena, root, three);
        assert_eq!(new_root, root);
        assert_eq!(arena[root as usize].r, Some(idx(&arena, 4)));
    }

    #[test]
    #[should_panic(expected = "rotate_right pivot has a left child")]
    fn rotate_without_pivot_panics() {
        let mut arena: Arena = vec![AvlNode::new(1, ())];
        rotate_right(&mut arena, 0, 0);
    }

    #[test]
    fn double_rotation_balance_rule() {
        let mut arena: Arena = (0..3).map(|k| AvlNode::new(k, ())).collect();
        for (child_bf, want) in [(-1, (0, 1)), (1, (-1, 0)), (0, (0, 0))] {
            arena[0].bf = child_bf;
            arena[1].bf = 2;
            arena[2].bf = -2;
            fix_double_rotation_balances(&mut arena, 0, 1, 2);
            assert_eq!((arena[1].bf, arena[2].bf), want);
            assert_eq!(arena[0].bf, 0);
        }
    }

    #[test]
    fn insert_ascending_rotates_left() {
        let (arena, root) = build(&[10, 20, 30]);
        assert_eq!(shape(&arena, root), [(Some(20), 0), (Some(10), 0), (Some(30), 0)]);
    }

    #[test]
    fn insert_zigzag_rotates_twice() {
        let (arena, root) = build(&[30, 10, 20]);
        assert_eq!(shape(&arena, root), [(Some(20), 0), (Some(10), 0), (Some(30), 0)]);
        let (arena, root) = build(&[10, 30, 20]);
        assert_eq!(shape(&arena, root), [(Some(20), 0), (Some(10), 0), (Some(30), 0)]);
    }

    #[test]
    fn insert_double_rotation_with_lopsided_pivot() {
        // Inserting 1 under 2 overflows the root on the outer side.
        let (arena, root) = build(&[5, 3, 8, 2, 4, 1]);
        assert_eq!(arena[root as usize].k, 3);

        // 45 lands under 40, the inner grandchild: left-right at 50, and the
        // pivot's right lean moves over to 30.
        let (arena, root) = build(&[50, 30, 80, 20, 40, 45]);
        assert_eq!(shape(&arena, root), [(Some(40), 0), (Some(30), -1), (Some(50), 0)]);
        let fifty = idx(&arena, 50);
        assert_eq!(shape(&arena, fifty), [(Some(50), 0), (Some(45), 0), (Some(80), 0)]);
    }

    #[test]
    fn remove_stops_after_rotation_when_pivot_was_level() {
        let (mut arena, root) = build(&[2, 1, 4, 3, 5]);
        let one = idx(&arena, 1);
        let root = remove(&mut arena, root, one).unwrap();
        assert_eq!(shape(&arena, root), [(Some(4), -1), (Some(2), 1), (Some(5), 0)]);
        assert_eq!(arena[one as usize].p, None);

        let (mut arena, root) = build(&[4, 5, 2, 1, 3]);
        let five = idx(&arena, 5);
        let root = remove(&mut arena, root, five).unwrap();
        assert_eq!(shape(&arena, root), [(Some(2), 1), (Some(1), 0), (Some(4), -1)]);
    }

    #[test]
    fn remove_double_rotation() {
        let (mut arena, root) = build(&[2, 1, 4, 3]);
        let one = idx(&arena, 1);
        let root = remove(&mut arena, root, one).unwrap();
        assert_eq!(shape(&arena, root), [(Some(3), 0), (Some(2), 0), (Some(4), 0)]);
    }

    #[test]
    fn remove_rotation_keeps_walking() {
        // Minimal AVL tree of height 4, every inner node leaning left.
        let (mut arena, root) = build(&[5, 3, 7, 2, 4, 6, 1]);
        assert_eq!(arena[root as usize].bf, -1);
        let six = idx(&arena, 6);
        let root = remove(&mut arena, root, six).unwrap();
        assert_avl_tree(&arena, Some(root), &i32::cmp).unwrap();
        assert_eq!(shape(&arena, root), [(Some(3), 0), (Some(2), -1), (Some(5), 0)]);
    }

    #[test]
    fn remove_two_children_swaps_with_predecessor() {
        let (mut arena, root) = build(&[4, 2, 6, 1, 3, 5, 7]);
        let four = idx(&arena, 4);
        let three = idx(&arena, 3);
        let root = remove(&mut arena, root, four).unwrap();
        assert_eq!(root, three);
        assert_eq!(arena[four as usize].p, None);
        assert_eq!(arena[four as usize].l, None);
        assert_eq!(arena[four as usize].r, None);
        assert_eq!(shape(&arena, root), [(Some(3), 0), (Some(2), -1), (Some(6), 0)]);
        // The detached record is no longer reachable; validate without it.
        assert_avl_tree(&arena, Some(root), &i32::cmp).unwrap();
    }

    #[test]
    fn remove_last_node_empties_tree() {
        let (mut arena, root) = build(&[1]);
        assert_eq!(remove(&mut arena, root, root), None);
    }

    #[test]
    fn assert_detects_stale_balance() {
        let (mut arena, root) = build(&[2, 1, 3]);
        arena[root as usize].bf = 1;
        let err = assert_avl_tree(&arena, Some(root), &i32::cmp).unwrap_err();
        assert!(matches!(err, Error::Invariant { node, .. } if node == root));
    }
}
