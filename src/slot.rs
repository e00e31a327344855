//! Slot storage: one tagged cell per probe position.

/// A key/value pair stored in a live slot.
///
/// The key is the table's own copy; the value is a caller-managed `Copy`
/// handle the table never releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    key: Box<str>,
    value: V,
}

impl<V> Entry<V> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_ref(&self) -> &V {
        &self.value
    }
}

impl<V: Copy> Entry<V> {
    pub(crate) fn new(key: &str, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn value(&self) -> V {
        self.value
    }
}

/// Observable state of a single slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SlotState {
    /// Never held an entry since the slot array was allocated.
    Empty,
    /// Holds a present entry.
    Live,
    /// Tombstone: the key was erased but the slot still extends probe chains.
    Dead,
}

#[derive(Debug)]
pub(crate) enum Slot<V> {
    Empty,
    Live(Entry<V>),
    // Key copy released; the value reference stays where it was.
    Dead(V),
}

impl<V> Slot<V> {
    pub(crate) fn state(&self) -> SlotState {
        match self {
            Slot::Empty => SlotState::Empty,
            Slot::Live(_) => SlotState::Live,
            Slot::Dead(_) => SlotState::Dead,
        }
    }

    pub(crate) fn live(&self) -> Option<&Entry<V>> {
        match self {
            Slot::Live(e) => Some(e),
            _ => None,
        }
    }
}

impl<V: Copy> Slot<V> {
    /// Turn a live slot into a tombstone, dropping the key copy. Returns
    /// false if the slot was not live.
    pub(crate) fn kill(&mut self) -> bool {
        let value = match self {
            Slot::Live(e) => e.value,
            _ => return false,
        };
        *self = Slot::Dead(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: Entries own a copy of the key independent of the caller's
    /// buffer.
    #[test]
    fn entry_copies_key() {
        let mut buf = String::from("owned");
        let e = Entry::new(&buf, 7u32);
        buf.push_str("-changed");
        assert_eq!(e.key(), "owned");
        assert_eq!(e.value(), 7);
        assert_eq!(*e.value_ref(), 7);
    }

    /// Invariant: Killing a live slot leaves a tombstone holding the value;
    /// killing any other slot is a no-op.
    #[test]
    fn kill_transitions() {
        let mut s = Slot::Live(Entry::new("k", 3i64));
        assert_eq!(s.state(), SlotState::Live);
        assert!(s.kill());
        assert_eq!(s.state(), SlotState::Dead);
        assert!(matches!(s, Slot::Dead(3)));
        assert!(s.live().is_none());

        assert!(!s.kill());
        let mut empty: Slot<i64> = Slot::Empty;
        assert!(!empty.kill());
        assert_eq!(empty.state(), SlotState::Empty);
    }
}
