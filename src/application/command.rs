//! Replayable ledger commands
//!
//! Every mutation of the ledger is expressed as a [`Command`]. Its `Display`
//! output is the canonical history line and `FromStr` reads it back, e.g.
//!
//! ```text
//! deposit($100.00)
//! clock(1h 30m)
//! branch('Shop').split(2)
//! branch('Shop (1)').merge(branch('Shop (2)'))
//! branch('Shop').item('apple').units(3).buy($2.40)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::domain::{Activity, Cents, DomainError, DomainResult, Minutes, Units};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Money spread over all branches by balance.
    Distribute { activity: Activity, amount: Cents },
    /// Time spread over all branches by balance.
    Clock { minutes: Minutes },
    Branch { name: String, action: BranchAction },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchAction {
    Rename(String),
    Describe(String),
    Money { activity: Activity, amount: Cents },
    Clock(Minutes),
    Split(usize),
    /// Absorb the named branch.
    Merge(String),
    Item {
        label: String,
        units: Units,
        action: ItemAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    Acquire,
    Discard,
    Relabel(String),
    Buy(Cents),
    Sell(Cents),
}

impl Command {
    pub fn distribute(activity: Activity, amount: Cents) -> Self {
        Command::Distribute { activity, amount }
    }

    pub fn branch(name: impl Into<String>, action: BranchAction) -> Self {
        Command::Branch {
            name: name.into(),
            action,
        }
    }

    pub fn item(
        name: impl Into<String>,
        label: impl Into<String>,
        units: Units,
        action: ItemAction,
    ) -> Self {
        Self::branch(
            name,
            BranchAction::Item {
                label: label.into(),
                units,
                action,
            },
        )
    }
}

/// Single-quote a string, escaping backslashes and quotes.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Distribute { activity, amount } => write!(f, "{activity}({amount})"),
            Command::Clock { minutes } => write!(f, "clock({minutes})"),
            Command::Branch { name, action } => write!(f, "branch({}).{action}", quote(name)),
        }
    }
}

impl fmt::Display for BranchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchAction::Rename(name) => write!(f, "rename({})", quote(name)),
            BranchAction::Describe(text) => write!(f, "describe({})", quote(text)),
            BranchAction::Money { activity, amount } => write!(f, "{activity}({amount})"),
            BranchAction::Clock(minutes) => write!(f, "clock({minutes})"),
            BranchAction::Split(ways) => write!(f, "split({ways})"),
            BranchAction::Merge(other) => write!(f, "merge(branch({}))", quote(other)),
            BranchAction::Item {
                label,
                units,
                action,
            } => {
                write!(f, "item({})", quote(label))?;
                if *units != Units::ONE {
                    write!(f, ".units({})", units.value())?;
                }
                write!(f, ".{action}")
            }
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemAction::Acquire => f.write_str("acquire()"),
            ItemAction::Discard => f.write_str("discard()"),
            ItemAction::Relabel(label) => write!(f, "relabel({})", quote(label)),
            ItemAction::Buy(cents) => write!(f, "buy({cents})"),
            ItemAction::Sell(cents) => write!(f, "sell({cents})"),
        }
    }
}

/// Hand-rolled scanner over one history line.
struct Cursor<'a> {
    line: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            rest: line.trim(),
        }
    }

    fn error(&self) -> DomainError {
        DomainError::type_mismatch("ledger command", self.line)
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, token: &str) -> DomainResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn ident(&mut self) -> DomainResult<&'a str> {
        let rest = self.rest;
        let end = rest
            .find(|c: char| !c.is_ascii_lowercase())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.error());
        }
        let (ident, tail) = rest.split_at(end);
        self.rest = tail;
        Ok(ident)
    }

    /// A single-quoted string with `\\` and `\'` escapes.
    fn quoted(&mut self) -> DomainResult<String> {
        self.expect("'")?;
        let rest = self.rest;
        let mut out = String::new();
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped @ ('\\' | '\''))) => out.push(escaped),
                    _ => return Err(self.error()),
                },
                '\'' => {
                    self.rest = &rest[i + 1..];
                    return Ok(out);
                }
                _ => out.push(c),
            }
        }
        Err(self.error())
    }

    /// A parenthesised quoted argument: `('...')`.
    fn quoted_arg(&mut self) -> DomainResult<String> {
        self.expect("(")?;
        let value = self.quoted()?;
        self.expect(")")?;
        Ok(value)
    }

    /// The text between `(` and the next `)`.
    fn raw(&mut self) -> DomainResult<&'a str> {
        self.expect("(")?;
        let rest = self.rest;
        let end = rest.find(')').ok_or_else(|| self.error())?;
        self.rest = &rest[end + 1..];
        Ok(&rest[..end])
    }

    /// A parenthesised argument parsed with `FromStr`.
    fn raw_arg<T: FromStr<Err = DomainError>>(&mut self) -> DomainResult<T> {
        self.raw()?.parse()
    }

    fn count_arg(&mut self) -> DomainResult<usize> {
        let raw = self.raw()?;
        raw.trim().parse().map_err(|_| self.error())
    }

    fn finish<T>(&self, value: T) -> DomainResult<T> {
        if self.rest.trim().is_empty() {
            Ok(value)
        } else {
            Err(self.error())
        }
    }
}

fn activity_named(name: &str) -> Option<Activity> {
    Activity::ALL.into_iter().find(|a| a.as_str() == name)
}

fn parse_item_action(cursor: &mut Cursor<'_>) -> DomainResult<ItemAction> {
    let action = match cursor.ident()? {
        "acquire" => {
            cursor.expect("()")?;
            ItemAction::Acquire
        }
        "discard" => {
            cursor.expect("()")?;
            ItemAction::Discard
        }
        "relabel" => ItemAction::Relabel(cursor.quoted_arg()?),
        "buy" => ItemAction::Buy(cursor.raw_arg()?),
        "sell" => ItemAction::Sell(cursor.raw_arg()?),
        _ => return Err(cursor.error()),
    };
    Ok(action)
}

fn parse_branch_action(cursor: &mut Cursor<'_>) -> DomainResult<BranchAction> {
    let ident = cursor.ident()?;
    if let Some(activity) = activity_named(ident) {
        return Ok(BranchAction::Money {
            activity,
            amount: cursor.raw_arg()?,
        });
    }
    let action = match ident {
        "rename" => BranchAction::Rename(cursor.quoted_arg()?),
        "describe" => BranchAction::Describe(cursor.quoted_arg()?),
        "clock" => BranchAction::Clock(cursor.raw_arg()?),
        "split" => BranchAction::Split(cursor.count_arg()?),
        "merge" => {
            cursor.expect("(branch")?;
            let other = cursor.quoted_arg()?;
            cursor.expect(")")?;
            BranchAction::Merge(other)
        }
        "item" => {
            let label = cursor.quoted_arg()?;
            let units = if cursor.eat(".units") {
                Units::new(i64::try_from(cursor.count_arg()?).map_err(|_| cursor.error())?)?
            } else {
                Units::ONE
            };
            cursor.expect(".")?;
            BranchAction::Item {
                label,
                units,
                action: parse_item_action(cursor)?,
            }
        }
        _ => return Err(cursor.error()),
    };
    Ok(action)
}

impl FromStr for Command {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        let ident = cursor.ident()?;
        let command = if let Some(activity) = activity_named(ident) {
            Command::Distribute {
                activity,
                amount: cursor.raw_arg()?,
            }
        } else {
            match ident {
                "clock" => Command::Clock {
                    minutes: cursor.raw_arg()?,
                },
                "branch" => {
                    let name = cursor.quoted_arg()?;
                    cursor.expect(".")?;
                    Command::Branch {
                        name,
                        action: parse_branch_action(&mut cursor)?,
                    }
                }
                _ => return Err(cursor.error()),
            }
        };
        cursor.finish(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_name_with_quote_when_displayed_then_escaped() {
        let command = Command::branch("Bob's", BranchAction::Split(2));
        assert_eq!(command.to_string(), r"branch('Bob\'s').split(2)");
    }

    #[test]
    fn given_single_unit_item_when_displayed_then_units_omitted() {
        let command = Command::item("Shop", "apple", Units::ONE, ItemAction::Acquire);
        assert_eq!(command.to_string(), "branch('Shop').item('apple').acquire()");
    }

    #[test]
    fn given_trailing_garbage_when_parsed_then_type_mismatch() {
        let result = "deposit($1.00) extra".parse::<Command>();
        assert!(matches!(result, Err(DomainError::TypeMismatch { .. })));
    }
}
