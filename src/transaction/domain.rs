//! Core transaction domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, connection::ConnectionId, database_id::DatabaseId, note::Note};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// A validated amount of money: a finite number greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    /// Parse an amount from user input, e.g. "12.50".
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAmount] if `text` is not a
    /// finite number, or an [Error::NonPositiveAmount] if it is zero or negative.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let trimmed = text.trim();

        let value: f64 = trimmed
            .parse()
            .map_err(|_| Error::InvalidAmount(trimmed.to_owned()))?;

        Self::new(value).map_err(|error| match error {
            Error::InvalidAmount(_) => Error::InvalidAmount(trimmed.to_owned()),
            error => error,
        })
    }

    /// Create an amount from a number.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAmount] if `value` is NaN or
    /// infinite, or an [Error::NonPositiveAmount] if it is zero or negative.
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            Err(Error::InvalidAmount(value.to_string()))
        } else if value <= 0.0 {
            Err(Error::NonPositiveAmount)
        } else {
            Ok(Self(value))
        }
    }

    /// The amount as a plain number.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which way the money went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// You gave them money, so they owe you more (a credit).
    Give,
    /// You took money from them, so you owe them more (a debit).
    Take,
}

impl Direction {
    /// Whether a transaction in this direction is stored as a credit.
    pub fn is_credit(self) -> bool {
        matches!(self, Direction::Give)
    }

    /// The direction of a stored transaction.
    pub fn from_is_credit(is_credit: bool) -> Self {
        if is_credit {
            Direction::Give
        } else {
            Direction::Take
        }
    }

    /// The label shown on buttons and in transaction lists.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Give => "Give",
            Direction::Take => "Take",
        }
    }

    /// The value used for the `direction` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Give => "give",
            Direction::Take => "take",
        }
    }
}

/// A single movement of money between you and a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The connection the money was exchanged with.
    pub connection_id: ConnectionId,
    /// The amount of money, always positive.
    pub amount: f64,
    /// `true` if you gave money (they owe you), `false` if you took money (you owe them).
    pub is_credit: bool,
    /// An optional free-text note.
    pub note: Option<Note>,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// The amount with a positive sign for credits and a negative sign for debits.
    pub fn signed_amount(&self) -> f64 {
        if self.is_credit {
            self.amount
        } else {
            -self.amount
        }
    }

    /// The direction of the transaction.
    pub fn direction(&self) -> Direction {
        Direction::from_is_credit(self.is_credit)
    }
}

/// Form data for creating a transaction.
///
/// `amount` and `note` are the raw text from the form so that invalid input can
/// be shown back to the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFormData {
    /// The raw amount, validated with [Amount::parse].
    #[serde(default)]
    pub amount: String,
    /// The raw note, validated with [Note::parse].
    #[serde(default)]
    pub note: String,
    /// Set by the button that submitted the form.
    pub direction: Option<Direction>,
}

#[cfg(test)]
mod amount_tests {
    use crate::{Error, transaction::Amount};

    #[test]
    fn parses_positive_numbers() {
        assert_eq!(Amount::parse("50").map(Amount::as_f64), Ok(50.0));
        assert_eq!(Amount::parse("12.34").map(Amount::as_f64), Ok(12.34));
        assert_eq!(Amount::parse(" 7 ").map(Amount::as_f64), Ok(7.0));
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(Amount::parse("0"), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn rejects_negative_numbers() {
        assert_eq!(Amount::parse("-5"), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn rejects_text() {
        assert_eq!(
            Amount::parse("abc"),
            Err(Error::InvalidAmount("abc".to_owned()))
        );
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(Amount::parse("  "), Err(Error::InvalidAmount("".to_owned())));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert_eq!(
            Amount::parse("inf"),
            Err(Error::InvalidAmount("inf".to_owned()))
        );
        assert_eq!(
            Amount::parse("NaN"),
            Err(Error::InvalidAmount("NaN".to_owned()))
        );
    }
}
