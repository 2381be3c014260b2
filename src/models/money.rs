//! Money type for representing bill amounts
//!
//! Bill shares are plain floating-point divisions of the bill (an even split of
//! 10,000 between three people is 3,333.333...), so amounts are stored as `f64`
//! and only rounded when formatted. Formatting always uses two decimals and
//! thousands separators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Tolerance used when comparing computed amounts
pub const AMOUNT_EPSILON: f64 = 1e-6;

/// Represents a monetary amount in the bill's currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create a Money amount from a raw value
    ///
    /// # Examples
    /// ```
    /// use patungan::models::Money;
    /// let amount = Money::new(15000.0);
    /// assert_eq!(amount.to_string(), "15,000.00");
    /// ```
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get the raw value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Check that the amount is a real number (not NaN or infinite)
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a quantity (line total = quantity * unit price)
    pub fn times(&self, quantity: f64) -> Self {
        Self(self.0 * quantity)
    }

    /// Divide into `parts` equal shares
    ///
    /// Returns `None` when `parts` is zero.
    pub fn share(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            None
        } else {
            Some(Self(self.0 / parts as f64))
        }
    }

    /// Compare two amounts within floating-point tolerance
    pub fn approx_eq(&self, other: Money) -> bool {
        (self.0 - other.0).abs() <= AMOUNT_EPSILON * self.0.abs().max(other.0.abs()).max(1.0)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "15000", "15,000", "15,000.50", "Rp 15000", "Rp.15.000",
    /// "15.000,50", "$10.50". A leading currency symbol (with any dot or space
    /// after it) is ignored. With both separators present the later one is the
    /// decimal point. A lone comma groups thousands; dots group thousands only
    /// when every group after the first has exactly three digits.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        // Drop any currency prefix; a bare leading dot is a decimal point
        let start = rest
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .unwrap_or(rest.len());
        let (prefix, body) = rest.split_at(start);
        let rest = if !prefix.is_empty() && prefix.chars().all(|c| c == '.') {
            &rest[start - 1..]
        } else {
            body
        };
        let (negative, rest) = match rest.strip_prefix('-') {
            Some(stripped) => (!negative, stripped),
            None => (negative, rest),
        };

        let compact: String = rest
            .chars()
            .filter(|c| !matches!(c, '_' | ' '))
            .collect();
        if compact.is_empty() {
            return Err(invalid());
        }

        let normalized = normalize_separators(&compact).ok_or_else(invalid)?;
        let value: f64 = normalized.parse().map_err(|_| invalid())?;

        if !value.is_finite() {
            return Err(invalid());
        }

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, e.g. "Rp 7,500.00" or "$7,500.00"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let separator = if symbol.chars().last().is_some_and(|c| c.is_alphabetic()) {
            " "
        } else {
            ""
        };
        let grouped = group_thousands(self.0.abs());
        if self.is_negative() && grouped != "0.00" {
            format!("-{}{}{}", symbol, separator, grouped)
        } else {
            format!("{}{}{}", symbol, separator, grouped)
        }
    }
}

/// Render a non-negative value with two decimals and comma thousands separators
fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}.{}", grouped, frac_part)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = group_thousands(self.0.abs());
        if self.is_negative() && grouped != "0.00" {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

/// Rewrite `digits` with `.` as the only (decimal) separator
fn normalize_separators(digits: &str) -> Option<String> {
    let last_dot = digits.rfind('.');
    let last_comma = digits.rfind(',');

    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => {
            let (whole, fraction) = digits.split_at(comma);
            Some(format!("{}.{}", whole.replace('.', ""), &fraction[1..]))
        }
        (Some(_), Some(_)) | (None, Some(_)) => Some(digits.replace(',', "")),
        (Some(_), None) => {
            let groups: Vec<&str> = digits.split('.').collect();
            let grouped = groups[0].len() <= 3
                && groups[1..]
                    .iter()
                    .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()));
            if grouped && !groups[0].is_empty() {
                Some(groups.concat())
            } else if groups.len() == 2 {
                Some(digits.to_string())
            } else {
                None
            }
        }
        (None, None) => Some(digits.to_string()),
    }
}
