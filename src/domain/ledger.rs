//! The branch registry and the operations that span several branches.

use tracing::debug;

use crate::domain::branch::{Activity, Branch};
use crate::domain::distribution::allocate_by_weight;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ordered_map::OrderedMap;
use crate::domain::quantity::{Balance, Cents, Minutes, Units, Wage};
use crate::domain::selector::Selector;

/// Name of the branch a fresh ledger starts with.
pub const DEFAULT_BRANCH_NAME: &str = "Initial";
pub const DEFAULT_DESCRIPTION: &str = "no description";

/// Branches keyed by name. The key always equals the branch's own name.
pub type Registry = OrderedMap<String, Branch>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    branches: Registry,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::seeded(DEFAULT_BRANCH_NAME, DEFAULT_DESCRIPTION)
    }
}

impl Ledger {
    /// A ledger holding one empty branch.
    pub fn seeded(name: &str, description: &str) -> Self {
        let mut branches = Registry::new();
        branches.set(name.to_string(), Branch::new(name, description));
        Self { branches }
    }

    /// Adopt an existing registry after checking every key against its branch.
    pub fn from_registry(branches: Registry) -> DomainResult<Self> {
        if let Some((key, branch)) = branches.iter().find(|(key, b)| key.as_str() != b.name()) {
            return Err(DomainError::type_mismatch(
                "registry key equal to branch name",
                format!("key {key:?} for branch {:?}", branch.name()),
            ));
        }
        Ok(Self { branches })
    }

    pub fn registry(&self) -> &Registry {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.branches.contains(name)
    }

    pub fn branch(&self, name: &str) -> DomainResult<&Branch> {
        self.branches.get(name).map_err(|_| branch_not_found(name))
    }

    fn branch_mut(&mut self, name: &str) -> DomainResult<&mut Branch> {
        self.branches.get_mut(name).map_err(|_| branch_not_found(name))
    }

    /// Resolve a selector to the name of an existing branch.
    pub fn resolve(&self, selector: &Selector) -> DomainResult<String> {
        let name = selector.resolve(&self.branches)?;
        self.branch(&name)?;
        Ok(name)
    }

    pub fn total_balance(&self) -> DomainResult<Balance> {
        let total: i128 = self.branches().map(|b| i128::from(b.balance().value())).sum();
        Balance::new(i64::try_from(total).map_err(|_| total_overflow("balance"))?)
    }

    pub fn total_profit(&self) -> DomainResult<Cents> {
        let total: i128 = self.branches().map(|b| i128::from(b.profit().value())).sum();
        Ok(Cents::new(
            i64::try_from(total).map_err(|_| total_overflow("profit"))?,
        ))
    }

    pub fn total_time_spent(&self) -> DomainResult<Minutes> {
        let total: i128 = self
            .branches()
            .map(|b| i128::from(b.time_spent().value()))
            .sum();
        Minutes::new(i64::try_from(total).map_err(|_| total_overflow("time"))?)
    }

    pub fn total_wage(&self) -> DomainResult<Wage> {
        Ok(Wage::new(self.total_profit()?, self.total_time_spent()?))
    }

    pub fn rename_branch(&mut self, name: &str, new_name: &str) -> DomainResult<()> {
        self.branch(name)?;
        if self.branches.contains(new_name) {
            return Err(DomainError::Duplicate(format!("branch {new_name:?}")));
        }
        let mut branch = self.branches.delete(name)?;
        branch.rename(new_name);
        self.branches.set(new_name.to_string(), branch);
        debug!("renamed branch {name:?} to {new_name:?}");
        Ok(())
    }

    pub fn describe_branch(&mut self, name: &str, description: &str) -> DomainResult<()> {
        self.branch_mut(name)?.describe(description);
        Ok(())
    }

    pub fn apply(&mut self, name: &str, activity: Activity, cents: Cents) -> DomainResult<()> {
        self.branch_mut(name)?.apply(activity, cents)
    }

    pub fn clock(&mut self, name: &str, minutes: Minutes) -> DomainResult<()> {
        self.branch_mut(name)?.clock(minutes)
    }

    pub fn acquire_item(&mut self, name: &str, label: &str, units: Units) -> DomainResult<()> {
        self.branch_mut(name)?.inventory_mut().acquire(label, units)
    }

    pub fn discard_item(&mut self, name: &str, label: &str, units: Units) -> DomainResult<()> {
        self.branch_mut(name)?.inventory_mut().discard(label, units)
    }

    pub fn relabel_item(
        &mut self,
        name: &str,
        label: &str,
        new_label: &str,
        units: Units,
    ) -> DomainResult<()> {
        self.branch_mut(name)?
            .inventory_mut()
            .relabel(label, new_label, units)
    }

    pub fn buy_item(
        &mut self,
        name: &str,
        label: &str,
        units: Units,
        cents: Cents,
    ) -> DomainResult<()> {
        self.branch_mut(name)?.buy(label, units, cents)
    }

    pub fn sell_item(
        &mut self,
        name: &str,
        label: &str,
        units: Units,
        cents: Cents,
    ) -> DomainResult<()> {
        self.branch_mut(name)?.sell(label, units, cents)
    }

    /// Replace a branch by `ways` children; returns the children's names.
    pub fn split_branch(&mut self, name: &str, ways: usize) -> DomainResult<Vec<String>> {
        let children = self.branch(name)?.split(ways)?;
        if let Some(taken) = children.iter().find(|c| self.branches.contains(c.name())) {
            return Err(DomainError::Duplicate(format!("branch {:?}", taken.name())));
        }
        let names: Vec<String> = children.iter().map(|c| c.name().to_string()).collect();
        for child in children {
            self.branches.set(child.name().to_string(), child);
        }
        self.branches.delete(name)?;
        debug!("split branch {name:?} into {names:?}");
        Ok(names)
    }

    /// Fold `source` into `target` and drop `source` from the registry.
    pub fn merge_branches(&mut self, target: &str, source: &str) -> DomainResult<()> {
        if target == source {
            return Err(DomainError::SelfMerge(target.to_string()));
        }
        self.branch(target)?.check_merge(self.branch(source)?)?;
        let absorbed = self.branches.delete(source)?;
        self.branch_mut(target)?.merge(absorbed)?;
        debug!("merged branch {source:?} into {target:?}");
        Ok(())
    }

    /// Pair every branch, in name order, with its balance-proportional share of `total`.
    fn allocation(&self, total: i64) -> DomainResult<Vec<(String, i64)>> {
        let weights: Vec<i64> = self.branches().map(|b| b.balance().value()).collect();
        let shares = allocate_by_weight(total, &weights)?;
        Ok(self.branches.keys().cloned().zip(shares).collect())
    }

    /// Spread a money movement over all branches by balance.
    ///
    /// Every share is validated before the first branch is touched.
    pub fn distribute(
        &mut self,
        activity: Activity,
        amount: Cents,
    ) -> DomainResult<Vec<(String, Cents)>> {
        amount.check_positive()?;
        let plan: Vec<(String, Cents)> = self
            .allocation(amount.value())
            .map_err(|e| describe_degenerate(e, amount))?
            .into_iter()
            .map(|(name, share)| (name, Cents::new(share)))
            .collect();
        if activity.draws_down() {
            self.total_balance()?.check(amount)?;
        }
        for (name, share) in &plan {
            self.branch(name)?.check(activity, *share)?;
        }
        for (name, share) in &plan {
            self.apply(name, activity, *share)?;
        }
        debug!("distributed {activity} {amount} over {} branches", plan.len());
        Ok(plan)
    }

    /// Spread clocked time over all branches by balance.
    pub fn distribute_time(&mut self, minutes: Minutes) -> DomainResult<Vec<(String, Minutes)>> {
        let plan = self
            .allocation(minutes.value())
            .map_err(|e| describe_degenerate(e, minutes))?
            .into_iter()
            .map(|(name, share)| Minutes::new(share).map(|m| (name, m)))
            .collect::<DomainResult<Vec<_>>>()?;
        for (name, share) in &plan {
            self.branch(name)?.check_clock(*share)?;
        }
        for (name, share) in &plan {
            self.clock(name, *share)?;
        }
        debug!("distributed {minutes} over {} branches", plan.len());
        Ok(plan)
    }
}

fn branch_not_found(name: &str) -> DomainError {
    DomainError::NotFound(format!("branch {name:?}"))
}

fn total_overflow(what: &str) -> DomainError {
    DomainError::RangeViolation(format!("total {what} overflow"))
}

fn describe_degenerate(error: DomainError, amount: impl ToString) -> DomainError {
    match error {
        DomainError::Degenerate(_) => DomainError::Degenerate(amount.to_string()),
        other => other,
    }
}
