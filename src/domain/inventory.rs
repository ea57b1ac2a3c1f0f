//! Labeled item counts held by a branch.

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ordered_map::OrderedMap;
use crate::domain::quantity::Units;
use crate::domain::selector::Selector;

/// Label → units, ascending by label. Never stores a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: OrderedMap<String, Units>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.items.contains(label)
    }

    /// Units held under `label`; zero when absent.
    pub fn units_of(&self, label: &str) -> Units {
        self.items.get(label).copied().unwrap_or(Units::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Units)> {
        self.items.iter()
    }

    pub fn resolve(&self, selector: &Selector) -> DomainResult<String> {
        selector.resolve(&self.items)
    }

    pub fn check_acquire(&self, label: &str, units: Units) -> DomainResult<()> {
        self.units_of(label).checked_add(units).map(|_| ())
    }

    /// Add units under `label`, creating it if needed. Zero units is a no-op.
    pub fn acquire(&mut self, label: &str, units: Units) -> DomainResult<()> {
        if units.is_zero() {
            return Ok(());
        }
        let total = self.units_of(label).checked_add(units)?;
        self.items.set(label.to_string(), total);
        Ok(())
    }

    pub fn check_discard(&self, label: &str, units: Units) -> DomainResult<()> {
        if units.is_zero() {
            return Ok(());
        }
        let held = self
            .items
            .get(label)
            .map_err(|_| DomainError::insufficient("units", units, format!("0x of {label:?}")))?;
        held.checked_sub(units).map(|_| ())
    }

    /// Remove units from `label`; an exhausted label disappears.
    pub fn discard(&mut self, label: &str, units: Units) -> DomainResult<()> {
        self.check_discard(label, units)?;
        if units.is_zero() {
            return Ok(());
        }
        let remaining = self.units_of(label).checked_sub(units)?;
        if remaining.is_zero() {
            self.items.delete(label)?;
        } else {
            self.items.set(label.to_string(), remaining);
        }
        Ok(())
    }

    pub fn check_relabel(&self, old_label: &str, new_label: &str, units: Units) -> DomainResult<()> {
        self.check_discard(old_label, units)?;
        if old_label != new_label {
            self.check_acquire(new_label, units)?;
        }
        Ok(())
    }

    /// Move units from one label to another.
    pub fn relabel(&mut self, old_label: &str, new_label: &str, units: Units) -> DomainResult<()> {
        self.check_relabel(old_label, new_label, units)?;
        self.discard(old_label, units)?;
        self.acquire(new_label, units)
    }

    /// Deal every label's units out over `ways` new inventories.
    ///
    /// Parts go round-robin from a cursor that carries over between labels and
    /// additionally skips ahead by each label's unit count. Only the per-label
    /// totals are guaranteed; which child receives the larger parts is not.
    pub fn split(&self, ways: usize) -> DomainResult<Vec<Inventory>> {
        if ways < 1 {
            return Err(DomainError::RangeViolation(format!(
                "cannot split inventory {ways} ways"
            )));
        }
        let divisor = i64::try_from(ways)
            .map_err(|_| DomainError::RangeViolation(format!("too many parts: {ways}")))?;
        let mut inventories = vec![Inventory::new(); ways];
        let mut cursor: usize = 0;
        for (label, units) in self.items.iter() {
            for part in units.split(ways)? {
                cursor %= ways;
                inventories[cursor].acquire(label, part)?;
                cursor += 1;
            }
            // rem_euclid is in 0..ways
            let skip = units.value().rem_euclid(divisor) as usize;
            cursor = (cursor + skip) % ways;
        }
        Ok(inventories)
    }

    pub fn check_merge(&self, other: &Inventory) -> DomainResult<()> {
        for (label, units) in other.iter() {
            self.check_acquire(label, *units)?;
        }
        Ok(())
    }

    /// Acquire every entry of `other`.
    pub fn merge(&mut self, other: Inventory) -> DomainResult<()> {
        self.check_merge(&other)?;
        for (label, units) in other.items {
            self.acquire(&label, units)?;
        }
        Ok(())
    }
}
