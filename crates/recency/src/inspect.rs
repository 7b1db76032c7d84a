//! Read-only views over the recency list
//!
//! Iteration, a human readable rendering for debugging, and a structural
//! check used by the test-suite after every mutation.

use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use ahash::AHashSet;

use crate::lru::LruCache;

/// Iterator over entries from most to least recently used
///
/// Created by [`LruCache::iter`]. Does not affect recency.
pub struct Iter<'a, K, V> {
    cache: &'a LruCache<K, V>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.cache.node(self.next?);
        self.next = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> LruCache<K, V> {
    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cache: self,
            next: self.head,
            remaining: self.map.len(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders the list head to tail, e.g. `entry["a": 1] -> entry["b": 2]`.
///
/// # Panics
/// Panics if the list contains a cycle.
impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.head.is_none() {
            return f.write_str("<nil>");
        }

        let mut seen = AHashSet::with_capacity(self.map.len());
        let mut current = self.head;
        while let Some(idx) = current {
            if !seen.insert(idx) {
                panic!("cycle in cache linked list");
            }
            if seen.len() > 1 {
                f.write_str(" -> ")?;
            }
            let node = self.node(idx);
            write!(f, "entry[{:?}: {:?}]", node.key, node.value)?;
            current = node.next;
        }
        Ok(())
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity())
            .field("len", &self.map.len())
            .field("entries", &format_args!("{}", self))
            .finish()
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
{
    /// Assert the structural invariants of the cache.
    ///
    /// Walks the recency list from head to tail and checks that it is
    /// acyclic, that every forward link has a matching back link, that it
    /// ends at `tail`, and that list and index hold the same entries.
    ///
    /// # Panics
    /// Panics with a description of the first violation found.
    pub fn check_invariants(&self) {
        let len = self.map.len();
        assert!(len <= self.capacity(), "size {} exceeds capacity {}", len, self.capacity());

        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, len, "arena holds {} entries but index holds {}", live, len);
        assert_eq!(
            live + self.free_list.len(),
            self.nodes.len(),
            "free list out of sync with arena"
        );

        if len == 0 {
            assert!(self.head.is_none(), "empty cache has a head");
            assert!(self.tail.is_none(), "empty cache has a tail");
            return;
        }

        let mut seen = AHashSet::with_capacity(len);
        let mut prev: Option<usize> = None;
        let mut current = self.head;
        while let Some(idx) = current {
            assert!(seen.insert(idx), "cycle in linked list at slot {}", idx);
            assert!(seen.len() <= len, "list is longer than index ({})", len);

            let node = self.node(idx);
            assert_eq!(node.prev, prev, "slot {} does not point back to {:?}", idx, prev);
            assert_eq!(
                self.map.get(&node.key),
                Some(&idx),
                "slot {} is not indexed under its key",
                idx
            );

            prev = Some(idx);
            current = node.next;
        }

        assert_eq!(prev, self.tail, "last element is not the tail");
        assert_eq!(seen.len(), len, "list length differs from index size");
    }
}
