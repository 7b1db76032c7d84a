//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in an arena of slots addressed by `usize` handles. The
//! recency list threads through the arena via `prev`/`next` handles, with
//! `head` the most recently used entry and `tail` the least.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 4096;

/// Node in the LRU doubly-linked list
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Toward the head (more recently used)
    pub(crate) prev: Option<usize>,
    /// Toward the tail (less recently used)
    pub(crate) next: Option<usize>,
}

/// LRU cache with fixed capacity
///
/// Every operation is O(1) amortized. A successful [`get`](Self::get) counts
/// as a use exactly like [`set`](Self::set); [`has`](Self::has) and
/// [`peek`](Self::peek) never touch the recency order.
///
/// The cache is not synchronized. Wrap it in a lock to share it.
pub struct LruCache<K, V> {
    pub(crate) map: HashMap<K, usize, RandomState>,
    pub(crate) nodes: Vec<Option<Node<K, V>>>,
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    pub(crate) free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is 0. Use [`try_new`](Self::try_new) to get an
    /// error instead.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        let reserve = capacity.min(PREALLOC_LIMIT);
        debug!(capacity, "creating lru cache");

        Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            nodes: Vec::with_capacity(reserve),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Create a new LRU cache, rejecting a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Insert or update a key, making it the most recently used entry
    ///
    /// Returns the previous value when the key was already present. Inserting
    /// a new key into a full cache evicts the least recently used entry.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.map.get(&key) {
            let old = std::mem::replace(&mut self.node_mut(idx).value, value);
            self.move_to_front(idx);
            return Some(old);
        }

        let idx = self.alloc_node(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.map.insert(key, idx);
        self.push_front(idx);

        if self.map.len() > self.capacity {
            self.evict();
        }

        None
    }

    /// Get a value from the cache, promoting it to most recently used
    ///
    /// A miss leaves the cache untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        Some(&self.node(idx).value)
    }

    /// Get a value without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(|&idx| &self.node(idx).value)
    }

    /// Check whether a key is present without changing its recency
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        Some(self.release(idx).value)
    }

    /// Drop every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        debug!(dropped = self.map.len(), "clearing lru cache");
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);
        self.push_front(idx);
    }

    /// Link a detached node in as the new head
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }

        if let Some(head_idx) = old_head {
            self.node_mut(head_idx).prev = Some(idx);
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Splice a node out of the list, leaving it detached
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match prev {
            Some(prev_idx) => self.node_mut(prev_idx).next = next,
            None => self.head = next,
        }

        match next {
            Some(next_idx) => self.node_mut(next_idx).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(idx);
        node.prev = None;
        node.next = None;
    }

    fn evict(&mut self) {
        let Some(tail_idx) = self.tail else {
            panic!("evict called with no tail");
        };

        let prev = self.node(tail_idx).prev;
        match prev {
            Some(prev_idx) => self.node_mut(prev_idx).next = None,
            None => self.head = None,
        }
        self.tail = prev;

        let node = self.release(tail_idx);
        self.map.remove(&node.key);
        trace!(slot = tail_idx, len = self.map.len(), "evicted least recently used entry");
    }

    fn alloc_node(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Take a node out of its slot and recycle the slot
    fn release(&mut self, idx: usize) -> Node<K, V> {
        match self.nodes[idx].take() {
            Some(node) => {
                self.free_list.push(idx);
                node
            }
            None => panic!("released empty slot {}", idx),
        }
    }
}

impl<K, V> LruCache<K, V> {
    /// Get the current number of entries
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Same as [`size`](Self::size)
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries held before eviction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn node(&self, idx: usize) -> &Node<K, V> {
        match &self.nodes[idx] {
            Some(node) => node,
            None => panic!("recency list points at empty slot {}", idx),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        match &mut self.nodes[idx] {
            Some(node) => node,
            None => panic!("recency list points at empty slot {}", idx),
        }
    }
}
