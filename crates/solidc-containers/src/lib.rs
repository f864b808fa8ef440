//! solidc Containers Library
//!
//! In-memory container types.
//!
//! # Containers
//!
//! - [`map`] - Open-addressed hash map with double hashing and tombstones
//! - [`sync_map`] - The hash map behind a per-map mutex
//! - [`bptree`] - Ordered map as a B+ tree with linked leaves
//! - [`pqueue`] - Binary heap ordered by a caller-supplied comparator
//!
//! The [`hash`] module holds the key hashing used by the map.

#![warn(missing_docs)]
#![warn(unsafe_code)]

use thiserror::Error;

pub mod bptree;
pub mod hash;
pub mod map;
pub mod pqueue;
pub mod sync_map;

pub use bptree::BPlusTree;
pub use hash::{FloatKey, MapKey};
pub use map::{HashMap, MapConfig};
pub use pqueue::{MaxQueue, MinQueue, PriorityQueue};
pub use sync_map::SyncMap;

/// Hash map failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The configuration was rejected at construction.
    #[error("invalid map configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: &'static str,
    },

    /// Allocating a table of `requested` slots failed; the map is unchanged.
    #[error("failed to allocate {requested} slots")]
    AllocationFailed {
        /// Requested slot count.
        requested: usize,
    },

    /// A probe sequence visited every slot without finding a place.
    #[error("probe sequence exhausted at capacity {capacity}")]
    ProbeExhausted {
        /// Table capacity at the time.
        capacity: usize,
    },
}

/// B+ tree construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BTreeError {
    /// Orders below 3 cannot keep the minimum-occupancy invariant.
    #[error("b+ tree order must be at least 3, got {order}")]
    InvalidOrder {
        /// Requested order.
        order: usize,
    },
}

/// Result alias for hash map operations.
pub type MapResult<T> = Result<T, MapError>;
