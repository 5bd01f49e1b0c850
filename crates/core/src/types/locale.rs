//! Locales and the source/target locale pairing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A catalog locale. The set is closed and known at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Ukrainian - the primary catalog locale.
    Uk,
    /// Russian.
    Ru,
    /// English.
    En,
}

impl Locale {
    /// The CMS locale code (`I18NLocaleCode`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uk => "uk",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a locale code.
#[derive(Debug, Error)]
#[error("unknown locale code: {0:?}")]
pub struct ParseLocaleError(pub String);

impl std::str::FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" => Ok(Self::Uk),
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            other => Err(ParseLocaleError(other.to_string())),
        }
    }
}

/// Error constructing a [`LocalePair`].
#[derive(Debug, Error)]
#[error("source and target locale must differ (both were {0})")]
pub struct LocalePairError(pub Locale);

/// An explicit source/target locale bijection for one sync run.
///
/// Every reconciliation operation reads from `source` and creates peers in
/// `target`. Keeping the pair as a struct (instead of scanning a locale
/// list for "the other one") makes the direction of a run unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalePair {
    pub source: Locale,
    pub target: Locale,
}

impl LocalePair {
    /// Build a pair, rejecting a degenerate source == target configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LocalePairError`] if both locales are the same.
    pub const fn new(source: Locale, target: Locale) -> Result<Self, LocalePairError> {
        if source as u8 == target as u8 {
            return Err(LocalePairError(source));
        }
        Ok(Self { source, target })
    }

    /// The same pair with the direction reversed.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl std::fmt::Display for LocalePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_round_trips_through_str() {
        for locale in [Locale::Uk, Locale::Ru, Locale::En] {
            assert_eq!(locale.as_str().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn test_locale_parse_is_case_insensitive() {
        assert_eq!("UK".parse::<Locale>().unwrap(), Locale::Uk);
        assert_eq!(" ru ".parse::<Locale>().unwrap(), Locale::Ru);
    }

    #[test]
    fn test_locale_parse_rejects_unknown() {
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_pair_rejects_same_locale() {
        assert!(LocalePair::new(Locale::Uk, Locale::Uk).is_err());
    }

    #[test]
    fn test_pair_flip() {
        let pair = LocalePair::new(Locale::Uk, Locale::Ru).unwrap();
        let flipped = pair.flip();
        assert_eq!(flipped.source, Locale::Ru);
        assert_eq!(flipped.target, Locale::Uk);
    }
}
