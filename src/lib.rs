//! probe-map: an open-addressing hash table from string keys to
//! caller-managed `Copy` values, with linear probing, tombstone deletion
//! and explicit growth.
//!
//! Internal Design:
//!
//! Summary
//! - One structure, `ProbeTable<V>`: a boxed slice of tagged slots
//!   (`Empty | Live | Dead`), a live-entry count, a tombstone count and a
//!   single iteration cursor.
//! - Every operation hashes the key to a home slot and walks forward with
//!   wraparound until it finds the key, an empty slot, or has visited every
//!   slot once.
//!
//! Constraints
//! - Single-threaded and synchronous; no internal locking. The table is
//!   plain owned data, so wrap it in one lock to share it.
//! - Probe walks are bounded by the capacity. A table with no empty slot
//!   answers lookups with "absent" and rejects new keys with
//!   `TableError::Full` instead of spinning.
//! - First insert wins: inserting a live key again is a no-op that reports
//!   `InsertOutcome::AlreadyPresent`.
//!
//! Hashing
//! - `hash::key_hash` is `h * 33 + c` over the ASCII-lowercased bytes,
//!   wrapping in `u64`. Key comparison is exact, so keys that differ only in
//!   case share a home slot but are distinct entries.
//!
//! Deletion and growth
//! - `erase` turns a live slot into a tombstone: the key copy is dropped,
//!   the value stays, and probe chains passing through the slot survive.
//!   Inserts may reclaim tombstones on their probe path.
//! - `grow` is never called implicitly. It doubles the capacity, re-places
//!   live entries in old-slot order and drops tombstones. Callers choose a
//!   trigger either by calling `grow` themselves or through
//!   `insert_with_policy` and a `GrowthPolicy` (`Manual`, `LoadFactor`).
//! - Slot arrays are allocated with `try_reserve_exact`; allocation failure
//!   is returned as `TableError::Alloc` and leaves an existing table intact.
//!
//! Iteration
//! - `first`/`next_entry` walk live slots in index order using the table's
//!   one cursor. `search`, `erase` and `insert` move that cursor, so the walk
//!   is not reentrant. `iter` borrows the table and ignores the cursor.
//!
//! Notes and non-goals
//! - Values are never dropped by the table (`V: Copy` has no destructor);
//!   the caller owns whatever a value refers to.
//! - No shrinking, no compaction of tombstones outside `grow`, no
//!   persistence.

mod error;
pub mod hash;
pub mod policy;
mod probe_table;
mod probe_table_proptest;
mod slot;

// Public surface
pub use error::TableError;
pub use policy::{GrowthPolicy, LoadFactor, Manual, Occupancy};
pub use probe_table::{GrowReport, InsertOutcome, Iter, ProbeTable};
pub use slot::{Entry, SlotState};
