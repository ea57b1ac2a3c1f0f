//! A ledger branch: money, time and inventory under one name.

use std::fmt;

use itertools::izip;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::inventory::Inventory;
use crate::domain::quantity::{Balance, Cents, Minutes, Units, Wage};

/// Money movements a branch (or the whole registry) can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Capital in; profit unaffected.
    Deposit,
    /// Capital out; profit unaffected.
    Withdraw,
    /// Operating income; balance and profit rise together.
    Earn,
    /// Operating expense; balance and profit fall together.
    Spend,
}

impl Activity {
    pub const ALL: [Activity; 4] = [
        Activity::Deposit,
        Activity::Withdraw,
        Activity::Earn,
        Activity::Spend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Activity::Deposit => "deposit",
            Activity::Withdraw => "withdraw",
            Activity::Earn => "earn",
            Activity::Spend => "spend",
        }
    }

    /// Whether the activity takes money out of balances.
    pub fn draws_down(self) -> bool {
        matches!(self, Activity::Withdraw | Activity::Spend)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: String,
    description: String,
    balance: Balance,
    profit: Cents,
    time_spent: Minutes,
    inventory: Inventory,
}

impl Branch {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            balance: Balance::ZERO,
            profit: Cents::ZERO,
            time_spent: Minutes::ZERO,
            inventory: Inventory::new(),
        }
    }

    /// Rebuild a branch from stored values.
    pub fn from_parts(
        name: impl Into<String>,
        description: impl Into<String>,
        balance: Balance,
        profit: Cents,
        time_spent: Minutes,
        inventory: Inventory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            balance,
            profit,
            time_spent,
            inventory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn profit(&self) -> Cents {
        self.profit
    }

    pub fn time_spent(&self) -> Minutes {
        self.time_spent
    }

    pub fn wage(&self) -> Wage {
        Wage::new(self.profit, self.time_spent)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Name uniqueness is the registry's concern.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn describe(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Balance and profit after `activity`, without applying it.
    fn outcome(&self, activity: Activity, cents: Cents) -> DomainResult<(Balance, Cents)> {
        match activity {
            Activity::Deposit => Ok((self.balance.checked_add(cents)?, self.profit)),
            Activity::Withdraw => Ok((self.balance.checked_sub(cents)?, self.profit)),
            Activity::Earn => Ok((
                self.balance.checked_add(cents)?,
                self.profit.checked_add(cents)?,
            )),
            Activity::Spend => Ok((
                self.balance.checked_sub(cents)?,
                self.profit.checked_sub(cents)?,
            )),
        }
    }

    pub fn check(&self, activity: Activity, cents: Cents) -> DomainResult<()> {
        self.outcome(activity, cents).map(|_| ())
    }

    pub fn apply(&mut self, activity: Activity, cents: Cents) -> DomainResult<()> {
        let (balance, profit) = self.outcome(activity, cents)?;
        self.balance = balance;
        self.profit = profit;
        Ok(())
    }

    pub fn deposit(&mut self, cents: Cents) -> DomainResult<()> {
        self.apply(Activity::Deposit, cents)
    }

    pub fn withdraw(&mut self, cents: Cents) -> DomainResult<()> {
        self.apply(Activity::Withdraw, cents)
    }

    pub fn earn(&mut self, cents: Cents) -> DomainResult<()> {
        self.apply(Activity::Earn, cents)
    }

    pub fn spend(&mut self, cents: Cents) -> DomainResult<()> {
        self.apply(Activity::Spend, cents)
    }

    pub fn check_clock(&self, minutes: Minutes) -> DomainResult<()> {
        self.time_spent.checked_add(minutes).map(|_| ())
    }

    pub fn clock(&mut self, minutes: Minutes) -> DomainResult<()> {
        self.time_spent = self.time_spent.checked_add(minutes)?;
        Ok(())
    }

    /// Pay `cents` for `units` of `label`.
    pub fn buy(&mut self, label: &str, units: Units, cents: Cents) -> DomainResult<()> {
        let (balance, profit) = self.outcome(Activity::Spend, cents)?;
        self.inventory.acquire(label, units)?;
        self.balance = balance;
        self.profit = profit;
        Ok(())
    }

    /// Give up `units` of `label` for `cents`, which must not be negative.
    pub fn sell(&mut self, label: &str, units: Units, cents: Cents) -> DomainResult<()> {
        cents.check_positive()?;
        let (balance, profit) = self.outcome(Activity::Earn, cents)?;
        self.inventory.discard(label, units)?;
        self.balance = balance;
        self.profit = profit;
        Ok(())
    }

    /// Names the children of a split, `"{name} (1)"` through `"{name} (ways)"`.
    pub fn split_names(&self, ways: usize) -> Vec<String> {
        (1..=ways).map(|i| format!("{} ({i})", self.name)).collect()
    }

    /// Divide into `ways` children whose quantities sum to this branch's.
    pub fn split(&self, ways: usize) -> DomainResult<Vec<Branch>> {
        if ways < 2 {
            return Err(DomainError::RangeViolation(format!(
                "a branch splits into at least 2 parts, got {ways}"
            )));
        }
        let children = izip!(
            self.split_names(ways),
            self.balance.split(ways)?,
            self.profit.split(ways)?,
            self.time_spent.split(ways)?,
            self.inventory.split(ways)?
        )
        .map(|(name, balance, profit, time_spent, inventory)| {
            Branch::from_parts(
                name,
                self.description.clone(),
                balance,
                profit,
                time_spent,
                inventory,
            )
        })
        .collect();
        Ok(children)
    }

    pub fn check_merge(&self, other: &Branch) -> DomainResult<()> {
        self.balance.checked_add(other.balance.as_cents())?;
        self.profit.checked_add(other.profit)?;
        self.time_spent.checked_add(other.time_spent)?;
        self.inventory.check_merge(&other.inventory)
    }

    /// Absorb everything `other` holds. Description and name stay ours.
    pub fn merge(&mut self, other: Branch) -> DomainResult<()> {
        self.check_merge(&other)?;
        self.balance = self.balance.checked_add(other.balance.as_cents())?;
        self.profit = self.profit.checked_add(other.profit)?;
        self.time_spent = self.time_spent.checked_add(other.time_spent)?;
        self.inventory.merge(other.inventory)
    }
}
