//! Strongly-typed ledger quantities.
//!
//! Each kind of number in the ledger gets its own newtype so that cents can
//! never be added to minutes by accident. All arithmetic is checked and
//! returns a [`DomainResult`]; nothing here panics on overflow.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

/// Split `total` into `ways` integers that sum exactly to `total`.
///
/// The first `total mod ways` parts are one larger than the rest. Division
/// floors, so negative totals split the same way (`-7` three ways is
/// `[-2, -2, -3]`).
pub fn split_int(total: i64, ways: usize) -> DomainResult<Vec<i64>> {
    if ways < 1 {
        return Err(DomainError::RangeViolation(format!(
            "cannot split {total} into {ways} parts"
        )));
    }
    let divisor = i64::try_from(ways)
        .map_err(|_| DomainError::RangeViolation(format!("too many parts: {ways}")))?;
    let quotient = total.div_euclid(divisor);
    // rem_euclid is in 0..divisor, so it fits a usize
    let larger = total.rem_euclid(divisor) as usize;
    Ok((0..ways)
        .map(|i| if i < larger { quotient + 1 } else { quotient })
        .collect())
}

fn non_negative(what: &str, value: i64) -> DomainResult<i64> {
    if value < 0 {
        Err(DomainError::RangeViolation(format!(
            "{what} cannot be negative: {value}"
        )))
    } else {
        Ok(value)
    }
}

fn overflow(what: &str) -> DomainError {
    DomainError::RangeViolation(format!("{what} overflow"))
}

fn decimal_regex() -> &'static Regex {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    DECIMAL.get_or_init(|| {
        Regex::new(r"^(?P<whole>\d+)(?:\.(?P<frac>\d*))?$").expect("decimal pattern is valid")
    })
}

fn duration_regex() -> &'static Regex {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    DURATION.get_or_init(|| {
        Regex::new(r"^(?P<hours>\d+)h\s*(?P<minutes>\d+)m$").expect("duration pattern is valid")
    })
}

/// Parse an unsigned decimal and multiply it by `scale`; the product must be whole.
///
/// Returns the magnitude as `i128`; the sign is applied before narrowing so
/// that `i64::MIN` still parses.
fn parse_scaled(digits: &str, scale: i128, expected: &'static str, raw: &str) -> DomainResult<i128> {
    let mismatch = || DomainError::type_mismatch(expected, raw);
    let caps = decimal_regex().captures(digits).ok_or_else(mismatch)?;
    let whole: i128 = caps["whole"].parse().map_err(|_| mismatch())?;
    let frac = caps
        .name("frac")
        .map_or("", |m| m.as_str())
        .trim_end_matches('0');
    if frac.len() > 18 {
        return Err(mismatch());
    }
    let denominator = 10_i128.pow(frac.len() as u32);
    let fraction: i128 = if frac.is_empty() {
        0
    } else {
        frac.parse().map_err(|_| mismatch())?
    };
    let numerator = whole
        .checked_mul(denominator)
        .and_then(|n| n.checked_add(fraction))
        .and_then(|n| n.checked_mul(scale))
        .ok_or_else(|| overflow(expected))?;
    if numerator % denominator != 0 {
        return Err(mismatch());
    }
    Ok(numerator / denominator)
}

/// Apply the sign and narrow to `i64`.
fn signed(negative: bool, magnitude: i128, expected: &'static str) -> DomainResult<i64> {
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| overflow(expected))
}

/// Split a leading minus sign off trimmed input.
fn strip_sign(text: &str) -> (bool, &str) {
    let trimmed = text.trim();
    match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    }
}

/// Non-negative count of inventory items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Units(i64);

impl Units {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    pub fn new(units: i64) -> DomainResult<Self> {
        non_negative("units", units).map(Self)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> DomainResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| overflow("units"))
    }

    /// Fails `Insufficient` if `other` exceeds `self`.
    pub fn checked_sub(self, other: Self) -> DomainResult<Self> {
        if other.0 > self.0 {
            return Err(DomainError::insufficient("units", other, self));
        }
        Ok(Self(self.0 - other.0))
    }

    pub fn split(self, ways: usize) -> DomainResult<Vec<Self>> {
        Ok(split_int(self.0, ways)?.into_iter().map(Self).collect())
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

impl FromStr for Units {
    type Err = DomainError;

    /// Accepts `"3"` and the canonical `"3x"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('x').unwrap_or(trimmed);
        let units: i64 = digits
            .parse()
            .map_err(|_| DomainError::type_mismatch("unit count", s))?;
        Self::new(units)
    }
}

/// Signed amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Self = Self(0);

    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Parse a dollar amount such as `12`, `12.5`, `$12.50` or `-$0.25`.
    ///
    /// Amounts that do not land on a whole cent are rejected.
    pub fn from_dollars(text: &str) -> DomainResult<Self> {
        let (negative, unsigned) = strip_sign(text);
        let digits = unsigned.strip_prefix('$').unwrap_or(unsigned);
        let expected = "dollar amount in whole cents";
        let cents = parse_scaled(digits, 100, expected, text)?;
        signed(negative, cents, expected).map(Self)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Zero counts as positive here: only negative amounts are rejected.
    pub fn check_positive(self) -> DomainResult<()> {
        if self.0 < 0 {
            return Err(DomainError::RangeViolation(format!(
                "amount must not be negative: {self}"
            )));
        }
        Ok(())
    }

    pub fn checked_add(self, other: Self) -> DomainResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| overflow("cents"))
    }

    pub fn checked_sub(self, other: Self) -> DomainResult<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or_else(|| overflow("cents"))
    }

    pub fn split(self, ways: usize) -> DomainResult<Vec<Self>> {
        Ok(split_int(self.0, ways)?.into_iter().map(Self).collect())
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", magnitude / 100, magnitude % 100)
    }
}

impl FromStr for Cents {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dollars(s)
    }
}

/// Cash on hand; never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(i64);

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(cents: i64) -> DomainResult<Self> {
        non_negative("balance", cents).map(Self)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn as_cents(self) -> Cents {
        Cents(self.0)
    }

    /// Validate that `cents` could be taken out of this balance.
    pub fn check(self, cents: Cents) -> DomainResult<()> {
        cents.check_positive()?;
        if cents.0 > self.0 {
            return Err(DomainError::insufficient("balance", cents, self));
        }
        Ok(())
    }

    pub fn checked_add(self, cents: Cents) -> DomainResult<Self> {
        cents.check_positive()?;
        self.0
            .checked_add(cents.0)
            .map(Self)
            .ok_or_else(|| overflow("balance"))
    }

    pub fn checked_sub(self, cents: Cents) -> DomainResult<Self> {
        self.check(cents)?;
        Ok(Self(self.0 - cents.0))
    }

    pub fn split(self, ways: usize) -> DomainResult<Vec<Self>> {
        Ok(split_int(self.0, ways)?.into_iter().map(Self).collect())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_cents().fmt(f)
    }
}

impl FromStr for Balance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Cents::from_dollars(s)?.value())
    }
}

/// Accumulated working time; never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Minutes(i64);

impl Minutes {
    pub const ZERO: Self = Self(0);

    pub fn new(minutes: i64) -> DomainResult<Self> {
        non_negative("minutes", minutes).map(Self)
    }

    /// Parse decimal hours (`1.5` is 90 minutes). The result must be whole minutes.
    pub fn from_hours(text: &str) -> DomainResult<Self> {
        let (negative, digits) = strip_sign(text);
        let expected = "hours in whole minutes";
        let minutes = parse_scaled(digits, 60, expected, text)?;
        Self::new(signed(negative, minutes, expected)?)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> DomainResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| overflow("minutes"))
    }

    pub fn checked_sub(self, other: Self) -> DomainResult<Self> {
        if other.0 > self.0 {
            return Err(DomainError::insufficient("time", other, self));
        }
        Ok(Self(self.0 - other.0))
    }

    pub fn split(self, ways: usize) -> DomainResult<Vec<Self>> {
        Ok(split_int(self.0, ways)?.into_iter().map(Self).collect())
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {:02}m", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Minutes {
    type Err = DomainError;

    /// Accepts the canonical `"1h 30m"` as well as decimal hours.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(caps) = duration_regex().captures(s.trim()) else {
            return Self::from_hours(s);
        };
        let mismatch = || DomainError::type_mismatch("duration", s);
        let hours: i64 = caps["hours"].parse().map_err(|_| mismatch())?;
        let minutes: i64 = caps["minutes"].parse().map_err(|_| mismatch())?;
        hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .ok_or_else(|| overflow("minutes"))
            .and_then(Self::new)
    }
}

/// Profit per hour worked, truncated to whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wage {
    hourly: Option<Cents>,
}

impl Wage {
    pub fn new(profit: Cents, time: Minutes) -> Self {
        if time.0 == 0 {
            return Self { hourly: None };
        }
        let per_hour = i128::from(profit.0) * 60 / i128::from(time.0);
        let clamped = per_hour.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        Self {
            hourly: Some(Cents(clamped)),
        }
    }

    /// `None` when no time has been clocked.
    pub fn hourly(self) -> Option<Cents> {
        self.hourly
    }
}

impl fmt::Display for Wage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hourly {
            Some(cents) => write!(f, "{cents}/h"),
            None => f.write_str("N/A"),
        }
    }
}
