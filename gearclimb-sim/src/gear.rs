//! Fixed-size gear loadout and the account power derived from it.

use serde::{Deserialize, Serialize};

use crate::constants::SLOT_COUNT;
use crate::numbers::usize_to_u64;

/// Power level of every equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GearSet {
    slots: [u32; SLOT_COUNT],
}

impl GearSet {
    /// Loadout with every slot at `power`.
    #[must_use]
    pub const fn uniform(power: u32) -> Self {
        Self {
            slots: [power; SLOT_COUNT],
        }
    }

    #[must_use]
    pub const fn from_slots(slots: [u32; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    #[must_use]
    pub const fn slots(&self) -> &[u32; SLOT_COUNT] {
        &self.slots
    }

    /// Floor average of all slots.
    #[must_use]
    pub fn account_power(&self) -> u32 {
        let total: u64 = self.slots.iter().copied().map(u64::from).sum();
        // The floor average of u32 values always fits back into u32.
        u32::try_from(total / usize_to_u64(SLOT_COUNT)).unwrap_or(u32::MAX)
    }

    /// Raise `slot` to `candidate` without lowering it or passing `power_cap`.
    ///
    /// Returns the slot's value after the update.
    pub fn raise(&mut self, slot: usize, candidate: u32, power_cap: u32) -> u32 {
        let current = self.slots[slot];
        let next = candidate.max(current).min(power_cap);
        self.slots[slot] = next;
        next
    }

    /// Lowest slot value.
    #[must_use]
    pub fn min_slot(&self) -> u32 {
        self.slots.iter().copied().min().unwrap_or(0)
    }

    /// Highest slot value.
    #[must_use]
    pub fn max_slot(&self) -> u32 {
        self.slots.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_power_floors_the_average() {
        let gear = GearSet::from_slots([400, 400, 400, 400, 400, 400, 400, 407]);
        assert_eq!(gear.account_power(), 400);
        let gear = GearSet::from_slots([401, 401, 401, 401, 401, 401, 401, 401]);
        assert_eq!(gear.account_power(), 401);
    }

    #[test]
    fn raise_only_moves_up_to_the_cap() {
        let mut gear = GearSet::uniform(400);
        assert_eq!(gear.raise(0, 403, 550), 403);
        assert_eq!(gear.raise(0, 401, 550), 403);
        assert_eq!(gear.raise(1, 600, 550), 550);
        assert_eq!(gear.slots()[1], 550);
        assert_eq!(gear.min_slot(), 400);
        assert_eq!(gear.max_slot(), 550);
    }
}
