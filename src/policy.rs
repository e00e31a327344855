//! Growth policies: when an insert should be preceded by `grow`.
//!
//! Plain `ProbeTable::insert` never grows. Callers that want automatic
//! growth route inserts through `ProbeTable::insert_with_policy` with one of
//! these policies, or their own `GrowthPolicy` implementation.

/// Snapshot of slot usage handed to a policy.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Occupancy {
    pub live: usize,
    pub dead: usize,
    pub capacity: usize,
}

impl Occupancy {
    /// Slots that are not empty. Tombstones count: they lengthen probe chains.
    pub fn occupied(&self) -> usize {
        self.live + self.dead
    }
}

pub trait GrowthPolicy {
    /// Whether the table should double before inserting one more entry.
    fn should_grow(&self, occupancy: Occupancy) -> bool;
}

/// Never grows; growth is left entirely to explicit `grow` calls.
#[derive(Copy, Clone, Debug, Default)]
pub struct Manual;

impl GrowthPolicy for Manual {
    #[inline]
    fn should_grow(&self, _occupancy: Occupancy) -> bool {
        false
    }
}

/// Grows once `(occupied + 1) / capacity` would exceed `max_load`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadFactor {
    max_load: f64,
}

impl LoadFactor {
    pub const DEFAULT_MAX_LOAD: f64 = 0.75;
    /// Lowest accepted threshold: at most 16 slots per occupied slot.
    pub const MIN_MAX_LOAD: f64 = 1.0 / 16.0;

    /// `max_load` is clamped into `[MIN_MAX_LOAD, 1]`; NaN falls back to the
    /// default.
    pub fn new(max_load: f64) -> Self {
        let max_load = if max_load.is_nan() {
            Self::DEFAULT_MAX_LOAD
        } else {
            max_load.clamp(Self::MIN_MAX_LOAD, 1.0)
        };
        Self { max_load }
    }

    pub fn max_load(&self) -> f64 {
        self.max_load
    }
}

impl Default for LoadFactor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LOAD)
    }
}

impl GrowthPolicy for LoadFactor {
    fn should_grow(&self, occupancy: Occupancy) -> bool {
        let next = (occupancy.occupied() + 1) as f64;
        next / occupancy.capacity as f64 > self.max_load
    }
}
