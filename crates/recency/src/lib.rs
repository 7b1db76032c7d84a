//! # recency
//!
//! Fixed-capacity, in-memory LRU cache.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to arena slot (O(1))
//! - **LRU List**: Doubly-linked list threaded through the arena (O(1))
//! - **Eviction**: Least recently used entry is dropped once size exceeds capacity
//!
//! ```
//! use recency::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get("a");
//! cache.set("c", 3); // evicts "b"
//!
//! assert!(cache.has("a"));
//! assert!(!cache.has("b"));
//! assert_eq!(cache.size(), 2);
//! ```

#![warn(missing_docs)]

mod error;
mod inspect;
mod lru;

pub use error::{Error, Result};
pub use inspect::Iter;
pub use lru::LruCache;
