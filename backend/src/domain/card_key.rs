//! Card identity.
//!
//! A [`CardKey`] is the one identity type shared by the catalogue, the status
//! store, and the HTTP surface. It is versioned by [`KeyScheme`]: name-level
//! keys predate per-printing tracking and still apply to every printing of a
//! name, while printing keys pin a single `(name, number)` pair.
//!
//! The wire form is `name` for name-level keys and `name|||number` for
//! printing keys. Names may not contain `|`, so decoding splits on the first
//! delimiter occurrence and is never ambiguous.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between name and number in the encoded key.
pub const KEY_DELIMITER: &str = "|||";

/// Validation errors raised while building card identities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardKeyValidationError {
    /// The name was missing or blank.
    #[error("card name must not be empty")]
    EmptyName,
    /// The name contained the delimiter character `|`.
    #[error("card name must not contain '|'")]
    NameContainsDelimiter,
}

/// A trimmed, non-empty card name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardName(String);

impl CardName {
    /// Validate and trim a card name.
    ///
    /// # Errors
    ///
    /// Rejects blank names and names containing `|`.
    pub fn new(value: &str) -> Result<Self, CardKeyValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CardKeyValidationError::EmptyName);
        }
        if trimmed.contains('|') {
            return Err(CardKeyValidationError::NameContainsDelimiter);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A trimmed, non-empty printed card number such as `OGN-001/298`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardNumber(String);

impl CardNumber {
    /// Trim a raw number; blank input yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Borrow the number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Granularity of a [`CardKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// Identity by name alone; applies to every printing of the name.
    Name,
    /// Identity by name and printed number.
    Printing,
}

/// Identity of a card in the status store.
///
/// Keys order by name, then number, with the name-level key first.
///
/// # Examples
/// ```
/// use binder::domain::{CardKey, KeyScheme};
///
/// let key = CardKey::new("Ashe", Some("A-1")).expect("valid key");
/// assert_eq!(key.scheme(), KeyScheme::Printing);
/// assert_eq!(key.encode(), "Ashe|||A-1");
/// assert_eq!(CardKey::decode("Ashe|||A-1"), Ok(key));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardKey {
    name: CardName,
    number: Option<CardNumber>,
}

impl CardKey {
    /// Build a key from raw parts. A blank number produces a name-level key.
    ///
    /// # Errors
    ///
    /// Propagates [`CardName::new`] validation failures.
    pub fn new(name: &str, number: Option<&str>) -> Result<Self, CardKeyValidationError> {
        Ok(Self {
            name: CardName::new(name)?,
            number: number.and_then(CardNumber::parse),
        })
    }

    /// Build a name-level key.
    ///
    /// # Errors
    ///
    /// Propagates [`CardName::new`] validation failures.
    pub fn name_level(name: &str) -> Result<Self, CardKeyValidationError> {
        Self::new(name, None)
    }

    /// Assemble a key from already validated parts.
    #[must_use]
    pub fn from_parts(name: CardName, number: Option<CardNumber>) -> Self {
        Self { name, number }
    }

    /// Card name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Printed number, absent for name-level keys.
    #[must_use]
    pub fn number(&self) -> Option<&str> {
        self.number.as_ref().map(CardNumber::as_str)
    }

    /// Identity granularity of this key.
    #[must_use]
    pub fn scheme(&self) -> KeyScheme {
        if self.number.is_some() {
            KeyScheme::Printing
        } else {
            KeyScheme::Name
        }
    }

    /// The name-level key covering this card.
    #[must_use]
    pub fn to_name_level(&self) -> Self {
        Self {
            name: self.name.clone(),
            number: None,
        }
    }

    /// Encode the key into its wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        match &self.number {
            Some(number) => format!("{}{KEY_DELIMITER}{}", self.name.as_str(), number.as_str()),
            None => self.name.as_str().to_owned(),
        }
    }

    /// Decode a key from its wire form.
    ///
    /// # Errors
    ///
    /// Rejects encodings with a blank name.
    pub fn decode(encoded: &str) -> Result<Self, CardKeyValidationError> {
        match encoded.split_once(KEY_DELIMITER) {
            Some((name, number)) => Self::new(name, Some(number)),
            None => Self::new(encoded, None),
        }
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<CardKey> for String {
    fn from(value: CardKey) -> Self {
        value.encode()
    }
}

impl TryFrom<String> for CardKey {
    type Error = CardKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}
