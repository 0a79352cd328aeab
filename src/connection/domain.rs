//! Core connection domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::DatabaseId, endpoints, note::Note};

/// The maximum number of characters allowed in a connection name.
pub const MAX_NAME_LENGTH: usize = 100;

/// A validated, non-empty connection name of at most [MAX_NAME_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ConnectionName(String);

impl ConnectionName {
    /// Create a connection name.
    ///
    /// Leading and trailing whitespace is removed before validation.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyConnectionName] if `name` is
    /// an empty string, or an [Error::ConnectionNameTooLong] if `name` has more
    /// than [MAX_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyConnectionName);
        }

        let length = name.graphemes(true).count();

        if length > MAX_NAME_LENGTH {
            Err(Error::ConnectionNameTooLong(length))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a connection name without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariants
    /// are violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for ConnectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ConnectionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConnectionName::new(s)
    }
}

impl Display for ConnectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a connection.
pub type ConnectionId = DatabaseId;

/// A person you exchange money with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// The ID of the connection.
    pub id: ConnectionId,
    /// The name of the person.
    pub name: ConnectionName,
    /// An optional free-text note about the person.
    pub note: Option<Note>,
    /// When the connection was created.
    pub created_at: OffsetDateTime,
}

/// The page to show after a connection has been created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnTo {
    /// Go back to the dashboard.
    #[default]
    Dashboard,
    /// Go back to the connections page.
    Connections,
}

impl ReturnTo {
    /// The URL of the page to go back to.
    pub fn endpoint(self) -> &'static str {
        match self {
            ReturnTo::Dashboard => endpoints::DASHBOARD_VIEW,
            ReturnTo::Connections => endpoints::CONNECTIONS_VIEW,
        }
    }

    /// The value used for the hidden `return_to` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnTo::Dashboard => "dashboard",
            ReturnTo::Connections => "connections",
        }
    }
}

/// Form data for creating a connection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionFormData {
    /// The raw name, validated with [ConnectionName::new].
    pub name: String,
    /// Where to send the user once the connection has been created.
    #[serde(default)]
    pub return_to: ReturnTo,
}

/// Form data for editing a connection.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditConnectionFormData {
    /// The raw name, validated with [ConnectionName::new].
    pub name: String,
    /// The raw note, validated with [Note::parse].
    #[serde(default)]
    pub note: String,
}
