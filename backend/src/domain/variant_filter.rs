//! Display-level allow-list for the default binder view.
//!
//! Catalogue numbers look like `OGN-001/298`, `OGN-042*/298`, or `OGN-301`.
//! Alternate-art variants carry a trailing glyph on the base segment and
//! overnumbered printings have a sequence index above the printed total for
//! their set. Both stay in the catalogue but are hidden from the default
//! view.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::catalogue::CardReference;

/// Glyph marking alternate-art variants when none is configured.
pub const DEFAULT_VARIANT_GLYPH: char = '*';

/// Printed totals used when a number has no `/total` suffix.
pub const DEFAULT_SET_LIMITS: &[(&str, u32)] = &[("OGN", 298)];

/// The pieces of a printed card number that matter for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberParts<'a> {
    /// Text before the first `/`, trimmed.
    pub base: &'a str,
    /// Leading non-digit part of the base without trailing separators.
    pub set_prefix: &'a str,
    /// First run of digits in the base. Runs too long for `u64` saturate.
    pub index: Option<u64>,
    /// Digits following the `/`, when present.
    pub printed_total: Option<u64>,
}

impl<'a> NumberParts<'a> {
    /// Split a printed number into its parts.
    ///
    /// # Examples
    /// ```
    /// use binder::domain::NumberParts;
    ///
    /// let parts = NumberParts::parse("OGN-042*/298");
    /// assert_eq!(parts.base, "OGN-042*");
    /// assert_eq!(parts.set_prefix, "OGN");
    /// assert_eq!(parts.index, Some(42));
    /// assert_eq!(parts.printed_total, Some(298));
    /// ```
    #[must_use]
    pub fn parse(number: &'a str) -> Self {
        let (base, total) = match number.split_once('/') {
            Some((base, total)) => (base.trim(), Some(total)),
            None => (number.trim(), None),
        };
        let digits_start = base.find(|c: char| c.is_ascii_digit());
        let set_prefix = digits_start
            .and_then(|start| base.get(..start))
            .unwrap_or(base)
            .trim_end_matches(['-', ' ']);
        let index = digits_start
            .and_then(|start| base.get(start..))
            .and_then(leading_number);
        Self {
            base,
            set_prefix,
            index,
            printed_total: total.map(str::trim).and_then(leading_number),
        }
    }
}

fn leading_number(text: &str) -> Option<u64> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let digits = text.get(..end).filter(|digits| !digits.is_empty())?;
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// How the variant filter classifies a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantClass {
    /// Shown in the default view.
    Regular,
    /// Base segment ends in a variant glyph.
    Variant,
    /// Sequence index exceeds the printed total of its set.
    Overnumbered,
}

/// Error raised when a `PREFIX=LIMIT` set limit cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid set limit {input:?}: expected PREFIX=COUNT")]
pub struct SetLimitParseError {
    input: String,
}

/// Printed total for one set, written `PREFIX=COUNT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLimit {
    /// Set prefix such as `OGN`.
    pub prefix: String,
    /// Highest regular sequence index in the set.
    pub limit: u32,
}

impl FromStr for SetLimit {
    type Err = SetLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SetLimitParseError {
            input: s.to_owned(),
        };
        let (prefix, limit) = s.split_once('=').ok_or_else(invalid)?;
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(invalid());
        }
        let limit = limit.trim().parse().map_err(|_| invalid())?;
        Ok(Self {
            prefix: prefix.to_owned(),
            limit,
        })
    }
}

/// Hides variant and overnumbered printings from the default view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFilter {
    glyphs: Vec<char>,
    set_limits: BTreeMap<String, u32>,
}

impl Default for VariantFilter {
    fn default() -> Self {
        Self::new(
            [DEFAULT_VARIANT_GLYPH],
            DEFAULT_SET_LIMITS.iter().map(|(prefix, limit)| SetLimit {
                prefix: (*prefix).to_owned(),
                limit: *limit,
            }),
        )
    }
}

impl VariantFilter {
    /// Build a filter from glyphs and per-set printed totals.
    pub fn new(
        glyphs: impl IntoIterator<Item = char>,
        set_limits: impl IntoIterator<Item = SetLimit>,
    ) -> Self {
        Self {
            glyphs: glyphs.into_iter().collect(),
            set_limits: set_limits
                .into_iter()
                .map(|limit| (limit.prefix.to_ascii_uppercase(), limit.limit))
                .collect(),
        }
    }

    /// Build a filter from configuration text: `glyphs` lists marker
    /// characters and `set_limits` holds comma-separated `PREFIX=COUNT`
    /// entries. Blank or absent values fall back to the defaults.
    ///
    /// # Errors
    /// Returns [`SetLimitParseError`] for a malformed set limit.
    ///
    /// # Examples
    /// ```
    /// use binder::domain::{VariantClass, VariantFilter};
    ///
    /// let filter = VariantFilter::from_config(Some("+"), Some("SFD=221"))?;
    /// assert_eq!(filter.classify(Some("SFD-222")), VariantClass::Overnumbered);
    /// assert_eq!(filter.classify(Some("SFD-010+")), VariantClass::Variant);
    /// # Ok::<(), binder::domain::SetLimitParseError>(())
    /// ```
    pub fn from_config(
        glyphs: Option<&str>,
        set_limits: Option<&str>,
    ) -> Result<Self, SetLimitParseError> {
        let defaults = Self::default();
        let glyphs = match glyphs {
            Some(raw) if !raw.trim().is_empty() => {
                raw.chars().filter(|glyph| !glyph.is_whitespace()).collect()
            }
            _ => defaults.glyphs,
        };
        let set_limits = match set_limits {
            Some(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .map(|entry| {
                    let parsed = entry.parse::<SetLimit>()?;
                    Ok((parsed.prefix.to_ascii_uppercase(), parsed.limit))
                })
                .collect::<Result<_, SetLimitParseError>>()?,
            _ => defaults.set_limits,
        };
        Ok(Self { glyphs, set_limits })
    }

    /// Classify a printed number. References without a number are regular.
    #[must_use]
    pub fn classify(&self, number: Option<&str>) -> VariantClass {
        let Some(number) = number else {
            return VariantClass::Regular;
        };
        let parts = NumberParts::parse(number);
        if parts.base.ends_with(self.glyphs.as_slice()) {
            return VariantClass::Variant;
        }
        let limit = parts.printed_total.or_else(|| {
            self.set_limits
                .get(&parts.set_prefix.to_ascii_uppercase())
                .copied()
                .map(u64::from)
        });
        match (parts.index, limit) {
            (Some(index), Some(limit)) if index > limit => VariantClass::Overnumbered,
            _ => VariantClass::Regular,
        }
    }

    /// Whether the reference belongs in the default view.
    #[must_use]
    pub fn is_displayed(&self, reference: &CardReference) -> bool {
        self.classify(reference.number()) == VariantClass::Regular
    }
}
