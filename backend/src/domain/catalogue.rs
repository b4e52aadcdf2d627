//! Reference catalogue parsing.
//!
//! The catalogue is a human-maintained, tab-separated text file: a header
//! line followed by `number<TAB>name` rows. Parsing is best-effort. Rows that
//! cannot yield a card are dropped and recorded in
//! [`CatalogueParse::dropped`] instead of failing the whole load.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::card_key::{CardKey, CardKeyValidationError};

/// A card printing listed in the reference catalogue.
///
/// # Examples
/// ```
/// use binder::domain::CardReference;
///
/// let reference = CardReference::new("Jinx", Some("A-1")).expect("valid reference");
/// assert_eq!(reference.name(), "Jinx");
/// assert_eq!(reference.number(), Some("A-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CardReferenceDto", into = "CardReferenceDto")]
pub struct CardReference {
    key: CardKey,
}

impl CardReference {
    /// Build a reference from raw catalogue fields.
    ///
    /// # Errors
    ///
    /// Fails when the name is blank or contains `|`.
    pub fn new(name: &str, number: Option<&str>) -> Result<Self, CardKeyValidationError> {
        CardKey::new(name, number).map(Self::from_key)
    }

    /// Wrap an existing identity.
    #[must_use]
    pub fn from_key(key: CardKey) -> Self {
        Self { key }
    }

    /// Card name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// Printed number, if the catalogue row carried one.
    #[must_use]
    pub fn number(&self) -> Option<&str> {
        self.key.number()
    }

    /// Identity of this printing.
    #[must_use]
    pub fn key(&self) -> &CardKey {
        &self.key
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardReferenceDto {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<String>,
}

impl From<CardReference> for CardReferenceDto {
    fn from(value: CardReference) -> Self {
        Self {
            name: value.name().to_owned(),
            number: value.number().map(str::to_owned),
        }
    }
}

impl TryFrom<CardReferenceDto> for CardReference {
    type Error = CardKeyValidationError;

    fn try_from(value: CardReferenceDto) -> Result<Self, Self::Error> {
        Self::new(&value.name, value.number.as_deref())
    }
}

/// Why a catalogue row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The row had no tab-separated name field.
    MissingNameField,
    /// The number field was blank.
    MissingNumber,
    /// The name field was blank.
    EmptyName,
    /// The name contained a character reserved by the key encoding.
    InvalidName,
}

impl From<CardKeyValidationError> for DropReason {
    fn from(value: CardKeyValidationError) -> Self {
        match value {
            CardKeyValidationError::EmptyName => Self::EmptyName,
            CardKeyValidationError::NameContainsDelimiter => Self::InvalidName,
        }
    }
}

/// A catalogue row that did not produce a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedLine {
    /// One-based line number in the source text.
    pub line_number: usize,
    /// Why the row was rejected.
    pub reason: DropReason,
}

/// Outcome of parsing catalogue text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueParse {
    /// Accepted references in source order.
    pub references: Vec<CardReference>,
    /// Rows that were rejected, in source order.
    pub dropped: Vec<DroppedLine>,
}

impl CatalogueParse {
    /// Distinct identities across all references.
    #[must_use]
    pub fn unique_keys(&self) -> BTreeSet<CardKey> {
        self.references
            .iter()
            .map(|reference| reference.key().clone())
            .collect()
    }

    /// Whether the catalogue holds no references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Parse tab-separated catalogue text.
///
/// The first line is a header and is always skipped, as are blank lines.
/// A row is accepted when it has at least two tab-separated fields with a
/// non-blank number in the first and a non-blank name in the second. Both
/// are trimmed and further fields are ignored.
///
/// # Examples
/// ```
/// use binder::domain::{parse_catalogue, CardReference};
///
/// let parse = parse_catalogue("N\tName\nA-1\tJinx\n\tSkip\n");
/// assert_eq!(
///     parse.references,
///     vec![CardReference::new("Jinx", Some("A-1")).expect("valid reference")]
/// );
/// ```
#[must_use]
pub fn parse_catalogue(text: &str) -> CatalogueParse {
    let mut parse = CatalogueParse::default();
    for (index, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(reference) => parse.references.push(reference),
            Err(reason) => parse.dropped.push(DroppedLine {
                line_number: index + 1,
                reason,
            }),
        }
    }
    parse
}

fn parse_row(line: &str) -> Result<CardReference, DropReason> {
    let (number, rest) = line.split_once('\t').ok_or(DropReason::MissingNameField)?;
    if number.trim().is_empty() {
        return Err(DropReason::MissingNumber);
    }
    let name = rest.split('\t').next().unwrap_or_default();
    CardReference::new(name, Some(number)).map_err(DropReason::from)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn reference(name: &str, number: Option<&str>) -> CardReference {
        CardReference::new(name, number).expect("valid reference")
    }

    #[rstest]
    fn skips_header_and_rows_without_names() {
        let parse = parse_catalogue("N\tName\nA-1\tJinx\n\tSkip\n");
        assert_eq!(parse.references, vec![reference("Jinx", Some("A-1"))]);
        assert_eq!(
            parse.dropped,
            vec![DroppedLine {
                line_number: 3,
                reason: DropReason::MissingNumber
            }]
        );
    }

    #[rstest]
    fn header_is_skipped_even_when_it_looks_like_data() {
        let parse = parse_catalogue("A-1\tJinx\nA-2\tVi\n");
        assert_eq!(parse.references, vec![reference("Vi", Some("A-2"))]);
    }

    #[rstest]
    fn records_dropped_rows_with_reasons() {
        let text = "Number\tName\nOGN-001\t  \nno-tab-here\nOGN-003\tJa|nx\nOGN-004\tAhri\n";
        let parse = parse_catalogue(text);
        assert_eq!(parse.references, vec![reference("Ahri", Some("OGN-004"))]);
        assert_eq!(
            parse.dropped,
            vec![
                DroppedLine {
                    line_number: 2,
                    reason: DropReason::EmptyName
                },
                DroppedLine {
                    line_number: 3,
                    reason: DropReason::MissingNameField
                },
                DroppedLine {
                    line_number: 4,
                    reason: DropReason::InvalidName
                },
            ]
        );
    }

    #[rstest]
    #[case("N\tName\n\tJinx\n")]
    #[case("N\tName\n   \tJinx\n")]
    fn rows_with_blank_numbers_are_dropped(#[case] text: &str) {
        let parse = parse_catalogue(text);
        assert!(parse.references.is_empty());
        assert_eq!(parse.dropped[0].reason, DropReason::MissingNumber);
    }

    #[rstest]
    fn fields_are_trimmed_and_extras_ignored() {
        let parse = parse_catalogue("N\tName\n A-1 \t Jinx \textra\n");
        assert_eq!(parse.references, vec![reference("Jinx", Some("A-1"))]);
    }

    #[rstest]
    fn blank_lines_and_crlf_are_tolerated() {
        let parse = parse_catalogue("N\tName\r\n\r\nA-1\tJinx\r\n\nA-2\tVi\r\n");
        assert_eq!(
            parse.references,
            vec![reference("Jinx", Some("A-1")), reference("Vi", Some("A-2"))]
        );
        assert!(parse.dropped.is_empty());
    }

    #[rstest]
    fn empty_text_yields_empty_catalogue() {
        assert!(parse_catalogue("").is_empty());
        assert!(parse_catalogue("N\tName").is_empty());
    }

    #[rstest]
    fn reprints_stay_distinct_but_dedupe_by_identity() {
        let parse = parse_catalogue("N\tName\nA-1\tAshe\nA-2\tAshe\nA-1\tAshe\n");
        assert_eq!(parse.references.len(), 3);
        assert_eq!(parse.unique_keys().len(), 2);
    }

    #[rstest]
    fn reference_serialises_without_absent_number() {
        let json = serde_json::to_value(reference("Jinx", None)).expect("serialise");
        assert_eq!(json, serde_json::json!({ "name": "Jinx" }));
    }
}
