use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use tracing::debug;

use crate::equal_paths::equal_paths;
use crate::error::{Error, Result};
use crate::util::{self, find, find_or_next_lower, first, last, next, prev};

use super::types::AvlNode;
use super::util as avl;

/// Ordered map backed by an AVL tree whose nodes live in a dense arena.
///
/// Nodes are addressed by `u32` arena indices. An index stays valid until the
/// next [`remove`](AvlMap::remove) or [`clear`](AvlMap::clear): removal
/// releases the node's slot immediately and moves the last arena record into
/// it.
pub struct AvlMap<K, V, C = fn(&K, &K) -> Ordering>
where
    C: Fn(&K, &K) -> Ordering,
{
    arena: Vec<AvlNode<K, V>>,
    root: Option<u32>,
    comparator: C,
}

impl<K, V> AvlMap<K, V, fn(&K, &K) -> Ordering>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self::with_comparator(K::cmp)
    }
}

impl<K, V> Default for AvlMap<K, V, fn(&K, &K) -> Ordering>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            comparator,
        }
    }

    fn push_node(&mut self, key: K, value: V) -> u32 {
        self.arena.push(AvlNode::new(key, value));
        util::to_index(self.arena.len() - 1)
    }

    /// Inserts `key`, or overwrites the value of an existing equal key in
    /// place. Returns the previous value in the latter case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            self.root = Some(self.push_node(key, value));
            return None;
        };

        let mut curr = root;
        loop {
            match (self.comparator)(&key, &self.arena[curr as usize].k) {
                Ordering::Equal => {
                    return Some(std::mem::replace(&mut self.arena[curr as usize].v, value));
                }
                Ordering::Less => match self.arena[curr as usize].l {
                    Some(l) => curr = l,
                    None => {
                        let n = self.push_node(key, value);
                        self.root = Some(avl::insert_left(&mut self.arena, root, n, curr));
                        return None;
                    }
                },
                Ordering::Greater => match self.arena[curr as usize].r {
                    Some(r) => curr = r,
                    None => {
                        let n = self.push_node(key, value);
                        self.root = Some(avl::insert_right(&mut self.arena, root, n, curr));
                        return None;
                    }
                },
            }
        }
    }

    /// Removes `key` and returns its value. Absent keys leave the tree
    /// untouched.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let root = self.root?;
        let Some(node) = self.find(key) else {
            debug!(len = self.len(), "remove: key not present");
            return None;
        };
        let root = avl::remove(&mut self.arena, root, node);
        let (record, root) = util::release(&mut self.arena, root, node);
        self.root = root;
        Some(record.v)
    }

    pub fn find(&self, key: &K) -> Option<u32> {
        find(&self.arena, self.root, key, |n| &n.k, &self.comparator)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| &self.arena[i as usize].v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(&mut self.arena[idx as usize].v)
    }

    /// Like [`get`](AvlMap::get), but reports an absent key as
    /// [`Error::KeyNotFound`].
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels; `0` for an empty map.
    pub fn height(&self) -> usize {
        util::height(&self.arena, self.root)
    }

    pub fn get_or_next_lower(&self, key: &K) -> Option<u32> {
        find_or_next_lower(&self.arena, self.root, key, |n| &n.k, &self.comparator)
    }

    pub fn first(&self) -> Option<u32> {
        first(&self.arena, self.root)
    }

    pub fn last(&self) -> Option<u32> {
        last(&self.arena, self.root)
    }

    pub fn next(&self, curr: u32) -> Option<u32> {
        next(&self.arena, curr)
    }

    pub fn prev(&self, curr: u32) -> Option<u32> {
        prev(&self.arena, curr)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first().map(|i| self.entry(i))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last().map(|i| self.entry(i))
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn arena(&self) -> &[AvlNode<K, V>] {
        &self.arena
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn key(&self, idx: u32) -> &K {
        &self.arena[idx as usize].k
    }

    pub fn value(&self, idx: u32) -> &V {
        &self.arena[idx as usize].v
    }

    pub fn value_mut_by_index(&mut self, idx: u32) -> &mut V {
        &mut self.arena[idx as usize].v
    }

    fn entry(&self, idx: u32) -> (&K, &V) {
        let n = &self.arena[idx as usize];
        (&n.k, &n.v)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            front: self.first(),
            back: self.last(),
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Whether all leaves sit at the same depth.
    pub fn has_equal_paths(&self) -> bool {
        equal_paths(&self.arena, self.root)
    }

    /// Checks links, balance factors, and key order.
    pub fn assert_valid(&self) -> Result<()> {
        avl::assert_avl_tree(&self.arena, self.root, &self.comparator)
    }

    pub fn print(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        avl::print(&self.arena, self.root, "")
    }
}

impl<K, V, C> Clone for AvlMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Fn(&K, &K) -> Ordering + Clone,
{
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for AvlMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Extend<(K, V)> for AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AvlMap<K, V, fn(&K, &K) -> Ordering>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the entries of an [`AvlMap`].
pub struct Iter<'a, K, V> {
    arena: &'a [AvlNode<K, V>],
    front: Option<u32>,
    back: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.front?;
        self.front = next(self.arena, i);
        self.remaining -= 1;
        let n = &self.arena[i as usize];
        Some((&n.k, &n.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.back?;
        self.back = prev(self.arena, i);
        self.remaining -= 1;
        let n = &self.arena[i as usize];
        Some((&n.k, &n.v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
