//! Addressing branches and inventory rows by name or by listing position.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ordered_map::OrderedMap;

/// 1-based row number as shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowNum(usize);

impl RowNum {
    pub fn new(num: usize) -> DomainResult<Self> {
        if num < 1 {
            return Err(DomainError::RangeViolation(format!(
                "row numbers start at 1, got {num}"
            )));
        }
        Ok(Self(num))
    }

    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// 0-based position into the ordered container.
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for RowNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.", self.0)
    }
}

/// Either an exact key or a row number into ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Name(String),
    Row(RowNum),
}

impl Selector {
    /// Resolve against a map keyed by name, returning the key.
    ///
    /// Names are returned as given without checking membership; callers that
    /// need the entry to exist look it up afterwards.
    pub fn resolve<V>(&self, map: &OrderedMap<String, V>) -> DomainResult<String> {
        match self {
            Selector::Name(name) => Ok(name.clone()),
            Selector::Row(row) => map.key_at(row.index()).cloned(),
        }
    }
}

impl FromStr for Selector {
    type Err = DomainError;

    /// All-digit input is a row number; anything else is a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let num = s
                .parse()
                .map_err(|_| DomainError::type_mismatch("row number", s))?;
            return RowNum::new(num).map(Selector::Row);
        }
        Ok(Selector::Name(s.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => f.write_str(name),
            Selector::Row(row) => write!(f, "row {}", row.0),
        }
    }
}
