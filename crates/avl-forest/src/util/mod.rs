//! Unbalanced binary-search-tree primitives over an arena of [`Node`]s.
//!
//! These know nothing about balancing. The AVL layer in [`crate::avl`] builds
//! on them: navigation (`first`, `next`, `prev`, ...), key search, plain
//! linking, splicing out a node with at most one child, the structural
//! [`swap`] and [`release`] of a detached record.
//!
//! Key-based helpers accept a `key_of` accessor closure so callers can use
//! any arena-backed node layout.

pub mod swap;

use std::cmp::Ordering;

use crate::types::Node;

pub use swap::swap;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Points whichever child link of `parent` currently holds `old` at `new`.
/// With no parent, `new` becomes the root.
#[inline]
pub(crate) fn replace_child<N: Node>(
    arena: &mut [N],
    parent: Option<u32>,
    old: u32,
    new: Option<u32>,
) {
    if let Some(p) = parent {
        if get_l(arena, p) == Some(old) {
            set_l(arena, p, new);
        } else {
            set_r(arena, p, new);
        }
    }
}

/// Converts an arena position into a node index.
///
/// Panics if the arena has grown past `u32` addressing.
#[inline]
pub(crate) fn to_index(pos: usize) -> u32 {
    u32::try_from(pos).expect("arena index fits in u32")
}

/// Leftmost node in the tree.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node in the tree.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, curr) {
        return last(arena, Some(l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes on the longest root-to-leaf path; `0` for an empty tree.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |i| {
        1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i)))
    })
}

/// Finds a node by key.
pub fn find<N, K, F, C>(
    arena: &[N],
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut curr = root;
    while let Some(i) = curr {
        curr = match comparator(key, key_of(&arena[i as usize])) {
            Ordering::Equal => return Some(i),
            Ordering::Less => get_l(arena, i),
            Ordering::Greater => get_r(arena, i),
        };
    }
    None
}

/// Finds node by key, or the next lower node if the exact key does not exist.
pub fn find_or_next_lower<N, K, F, C>(
    arena: &[N],
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut curr = root;
    let mut result: Option<u32> = None;
    while let Some(i) = curr {
        match comparator(key_of(&arena[i as usize]), key) {
            Ordering::Equal => return Some(i),
            Ordering::Greater => curr = get_l(arena, i),
            Ordering::Less => {
                result = Some(i);
                curr = get_r(arena, i);
            }
        }
    }
    result
}

/// Inserts `node` immediately to the right of `parent`.
pub fn insert_right<N: Node>(arena: &mut [N], node: u32, parent: u32) {
    let r = get_r(arena, parent);
    set_r(arena, node, r);
    set_r(arena, parent, Some(node));
    set_p(arena, node, Some(parent));
    if let Some(r) = r {
        set_p(arena, r, Some(node));
    }
}

/// Inserts `node` immediately to the left of `parent`.
pub fn insert_left<N: Node>(arena: &mut [N], node: u32, parent: u32) {
    let l = get_l(arena, parent);
    set_l(arena, node, l);
    set_l(arena, parent, Some(node));
    set_p(arena, node, Some(parent));
    if let Some(l) = l {
        set_p(arena, l, Some(node));
    }
}

/// Plain BST leaf insert using comparator and key accessor. Equal keys go
/// right. Returns the (possibly new) root.
pub fn insert<N, K, F, C>(
    arena: &mut [N],
    root: Option<u32>,
    node: u32,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> Ordering,
{
    let Some(mut curr) = root else {
        return Some(node);
    };

    loop {
        let cmp = comparator(key_of(&arena[node as usize]), key_of(&arena[curr as usize]));
        let next = if cmp == Ordering::Less {
            get_l(arena, curr)
        } else {
            get_r(arena, curr)
        };

        match next {
            Some(nxt) => curr = nxt,
            None => {
                if cmp == Ordering::Less {
                    insert_left(arena, node, curr);
                } else {
                    insert_right(arena, node, curr);
                }
                return root;
            }
        }
    }
}

/// Splices `node`, which must have at most one child, out of the tree: its
/// child (if any) takes its place under its parent. `node` is left with no
/// links. Returns the new root.
pub fn splice<N: Node>(arena: &mut [N], root: Option<u32>, node: u32) -> Option<u32> {
    let p = get_p(arena, node);
    let l = get_l(arena, node);
    let r = get_r(arena, node);
    assert!(
        l.is_none() || r.is_none(),
        "splice target {node} has two children"
    );
    set_p(arena, node, None);
    set_l(arena, node, None);
    set_r(arena, node, None);

    let child = l.or(r);
    if let Some(c) = child {
        set_p(arena, c, p);
    }
    match p {
        Some(_) => {
            replace_child(arena, p, node, child);
            root
        }
        None => child,
    }
}

/// Drops the detached record at `node` from the arena and hands it back.
///
/// The arena stays dense: the last record is moved into the freed slot and
/// every link pointing at it (parent's child link, children's parent links,
/// the root) is rewritten. Indices other than the moved one are unaffected.
/// Returns the released record and the possibly re-indexed root.
pub fn release<N: Node>(arena: &mut Vec<N>, root: Option<u32>, node: u32) -> (N, Option<u32>) {
    debug_assert!(
        get_p(arena, node).is_none() && get_l(arena, node).is_none() && get_r(arena, node).is_none(),
        "released node {node} is still linked"
    );
    let moved = to_index(arena.len() - 1);
    let record = arena.swap_remove(node as usize);
    if moved == node {
        return (record, root);
    }

    let p = get_p(arena, node);
    replace_child(arena, p, moved, Some(node));
    if let Some(l) = get_l(arena, node) {
        set_p(arena, l, Some(node));
    }
    if let Some(r) = get_r(arena, node) {
        set_p(arena, r, Some(node));
    }
    let root = if root == Some(moved) { Some(node) } else { root };
    (record, root)
}
