//! ProbeTable: open-addressing string map with linear probing and tombstones.

use crate::error::TableError;
use crate::hash::home_slot;
use crate::policy::{GrowthPolicy, Occupancy};
use crate::slot::{Entry, Slot, SlotState};
use core::fmt;
use core::iter::FusedIterator;
use log::{debug, trace, warn};

/// Result of a successful `insert`. Inserting a key that is already live
/// keeps the stored value and reports where it lives.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    Inserted { slot: usize },
    AlreadyPresent { slot: usize },
}

impl InsertOutcome {
    pub fn slot(&self) -> usize {
        match *self {
            InsertOutcome::Inserted { slot } | InsertOutcome::AlreadyPresent { slot } => slot,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }
}

/// What a call to `grow` did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GrowReport {
    pub old_capacity: usize,
    pub new_capacity: usize,
    /// Live entries moved into the new slot array.
    pub rehashed: usize,
    /// Tombstones dropped during the rebuild.
    pub discarded_tombstones: usize,
}

enum Probe {
    Found(usize),
    Vacant(usize),
    Full,
}

/// Fixed-capacity open-addressing table keyed by strings.
///
/// Every live key is reachable by walking forward (with wraparound) from its
/// home slot without crossing an empty slot. Erase leaves a tombstone so
/// those walks stay intact; tombstones are only reclaimed by `grow` or by a
/// later insert that lands on them.
///
/// The table owns its key copies. Values are `Copy` handles managed by the
/// caller; the table never releases them.
pub struct ProbeTable<V> {
    slots: Box<[Slot<V>]>,
    size: usize,
    dead: usize,
    cursor: Option<usize>,
    grows: usize,
}

fn alloc_slots<V>(capacity: usize) -> Result<Box<[Slot<V>]>, TableError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::Alloc { capacity, source })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots.into_boxed_slice())
}

/// Iterator over live entries in ascending slot order.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.find_map(|s| s.live())?;
        self.remaining -= 1;
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a ProbeTable<V> {
    type Item = &'a Entry<V>;
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> ProbeTable<V> {
    pub fn len(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    /// Number of dead (tombstoned) slots.
    pub fn tombstones(&self) -> usize {
        self.dead
    }
    /// Slot index of the cursor, if set.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
    /// Number of completed `grow` calls over the table's lifetime.
    pub fn grow_count(&self) -> usize {
        self.grows
    }
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }
    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            live: self.size,
            dead: self.dead,
            capacity: self.capacity(),
        }
    }

    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).map(Slot::state)
    }

    /// Live entry stored at `index`, if any.
    pub fn entry_at(&self, index: usize) -> Option<&Entry<V>> {
        self.slots.get(index).and_then(Slot::live)
    }

    /// Live entries in slot order. Does not touch the cursor.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.size,
        }
    }

    // Walk from the home slot for at most one full cycle. Stops at the key,
    // or at the first empty slot, reporting the first tombstone seen on the
    // way as the preferred vacancy.
    fn probe(&self, key: &str) -> Probe {
        let cap = self.capacity();
        let mut pos = home_slot(key, cap);
        let mut first_dead = None;
        for _ in 0..cap {
            match &self.slots[pos] {
                Slot::Empty => return Probe::Vacant(first_dead.unwrap_or(pos)),
                Slot::Dead(_) => {
                    first_dead.get_or_insert(pos);
                }
                Slot::Live(e) if e.key() == key => return Probe::Found(pos),
                Slot::Live(_) => {}
            }
            pos += 1;
            if pos == cap {
                pos = 0;
            }
        }
        first_dead.map_or(Probe::Full, Probe::Vacant)
    }

    fn locate(&self, key: &str) -> Option<usize> {
        match self.probe(key) {
            Probe::Found(i) => Some(i),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    fn scan_from(&mut self, start: usize) -> Option<&Entry<V>> {
        let i = (start..self.capacity()).find(|&i| self.slots[i].state() == SlotState::Live)?;
        self.cursor = Some(i);
        self.slots[i].live()
    }

    /// First live entry in slot order; moves the cursor to it.
    pub fn first(&mut self) -> Option<&Entry<V>> {
        self.scan_from(0)
    }

    /// Next live entry strictly after the cursor (from slot 0 when the
    /// cursor is unset); moves the cursor to it.
    ///
    /// There is a single cursor per table. `search`, `erase` and `insert`
    /// move it too, so interleaving them with a walk changes where the walk
    /// resumes. Use `iter` for traversal that must not be disturbed.
    pub fn next_entry(&mut self) -> Option<&Entry<V>> {
        let start = self.cursor.map_or(0, |c| c + 1);
        self.scan_from(start)
    }
}

impl<V: Copy> ProbeTable<V> {
    /// Upper bound on slots per occupied slot that `insert_with_policy` will
    /// grow to.
    pub const MAX_SLOTS_PER_ENTRY: usize = 64;

    /// Allocate `capacity` empty slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        let slots = alloc_slots(capacity)?;
        debug!("created probe table with {} slots", capacity);
        Ok(Self {
            slots,
            size: 0,
            dead: 0,
            cursor: None,
            grows: 0,
        })
    }

    fn place(&mut self, slot: usize, entry: Entry<V>) {
        if self.slots[slot].state() == SlotState::Dead {
            self.dead -= 1;
        }
        self.slots[slot] = Slot::Live(entry);
        self.cursor = Some(slot);
        self.size += 1;
    }

    /// Insert `key` unless it is already live. The first insert of a key wins:
    /// a second insert leaves the stored value untouched.
    ///
    /// A new entry takes the first empty or dead slot on the key's probe path.
    /// Never grows the table; fails with `TableError::Full` when no slot is
    /// available.
    pub fn insert(&mut self, key: &str, value: V) -> Result<InsertOutcome, TableError> {
        match self.probe(key) {
            Probe::Found(slot) => Ok(InsertOutcome::AlreadyPresent { slot }),
            Probe::Vacant(slot) => {
                self.place(slot, Entry::new(key, value));
                Ok(InsertOutcome::Inserted { slot })
            }
            Probe::Full => {
                let capacity = self.capacity();
                warn!("insert of {:?} rejected: all {} slots live", key, capacity);
                Err(TableError::Full { capacity })
            }
        }
    }

    /// Insert after letting `policy` decide whether to grow first.
    ///
    /// Grows repeatedly while the policy asks for it, but never past
    /// `MAX_SLOTS_PER_ENTRY` slots per occupied slot (counting the new one),
    /// so a policy that never settles cannot exhaust memory. Duplicate keys
    /// short circuit without consulting the policy.
    pub fn insert_with_policy<P>(
        &mut self,
        key: &str,
        value: V,
        policy: &P,
    ) -> Result<InsertOutcome, TableError>
    where
        P: GrowthPolicy + ?Sized,
    {
        if let Some(slot) = self.locate(key) {
            return Ok(InsertOutcome::AlreadyPresent { slot });
        }
        loop {
            let occupancy = self.occupancy();
            let ceiling =
                (occupancy.occupied() + 1).saturating_mul(Self::MAX_SLOTS_PER_ENTRY);
            if occupancy.capacity >= ceiling || !policy.should_grow(occupancy) {
                break;
            }
            self.grow()?;
        }
        self.insert(key, value)
    }

    /// Find a live entry and move the cursor to it.
    pub fn search(&mut self, key: &str) -> Option<&Entry<V>> {
        let i = self.locate(key)?;
        self.cursor = Some(i);
        self.slots[i].live()
    }

    /// Value stored under `key`, without moving the cursor.
    pub fn get(&self, key: &str) -> Option<V> {
        self.locate(key)
            .and_then(|i| self.slots[i].live())
            .map(Entry::value)
    }

    /// Tombstone the entry for `key`. Returns false when the key is absent.
    ///
    /// The slot stays occupied so longer probe chains through it survive; the
    /// key copy is released and the value is left alone. Like `search`, a hit
    /// moves the cursor to the erased slot.
    pub fn erase(&mut self, key: &str) -> bool {
        let Some(i) = self.locate(key) else {
            return false;
        };
        self.cursor = Some(i);
        if !self.slots[i].kill() {
            return false;
        }
        self.size -= 1;
        self.dead += 1;
        trace!("tombstoned slot {} ({} live, {} dead)", i, self.size, self.dead);
        true
    }

    /// Double the capacity and rebuild: live entries are re-placed in
    /// ascending old-slot order against the new capacity, tombstones are
    /// dropped, and the cursor is unset.
    ///
    /// A cursor walk in progress does not survive: the next `next_entry`
    /// restarts at slot 0 of the new array.
    ///
    /// The new slot array is allocated before any state changes, so an
    /// error leaves the table untouched.
    pub fn grow(&mut self) -> Result<GrowReport, TableError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow {
                capacity: old_capacity,
            })?;
        let fresh = alloc_slots(new_capacity)?;
        let old = core::mem::replace(&mut self.slots, fresh);
        let discarded_tombstones = self.dead;
        self.size = 0;
        self.dead = 0;
        for slot in old.into_vec() {
            if let Slot::Live(entry) = slot {
                self.rehash(entry);
            }
        }
        self.cursor = None;
        self.grows += 1;

        let report = GrowReport {
            old_capacity,
            new_capacity,
            rehashed: self.size,
            discarded_tombstones,
        };
        debug!(
            "grew probe table {} -> {} slots ({} rehashed, {} tombstones dropped)",
            old_capacity, new_capacity, report.rehashed, discarded_tombstones
        );
        Ok(report)
    }

    // Rebuild path: keys are distinct and the fresh array has no tombstones,
    // so the first empty slot on the probe path is where insert would go.
    // The fresh array holds at least twice the live count, so one exists.
    fn rehash(&mut self, entry: Entry<V>) {
        let cap = self.capacity();
        debug_assert!(self.size < cap);
        let mut slot = home_slot(entry.key(), cap);
        while self.slots[slot].state() != SlotState::Empty {
            slot += 1;
            if slot == cap {
                slot = 0;
            }
        }
        self.place(slot, entry);
    }
}

impl<V: fmt::Debug> fmt::Debug for ProbeTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (e.key(), e.value_ref())))
            .finish()
    }
}
