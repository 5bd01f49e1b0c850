//! Slug and code derivation.
//!
//! Slugs and codes are derived exactly once, from source-locale text, and
//! reused verbatim on every localization peer. Re-deriving them from a
//! translated string would fork the natural key across locales.

use crate::EntityId;

/// Transliterate-and-slugify a human-readable name.
///
/// Cyrillic input comes out as lowercase ASCII joined with `-`, e.g.
/// `"Кількість жив"` becomes `"kilkist-zhiv"`.
#[must_use]
pub fn derive_slug(name: &str) -> String {
    slug::slugify(name)
}

/// Derive the locale-invariant code of a parameter value.
///
/// The owning type id is appended so the code is unique per
/// (type, normalized value) even when two types share a value text.
#[must_use]
pub fn derive_code(value: &str, parameter_type: &EntityId) -> String {
    format!("{}-{}", slug::slugify(value), parameter_type)
}

/// Slug for a localized product peer: re-derived from the translated title
/// with the target locale appended to keep it unique across locales.
#[must_use]
pub fn derive_localized_slug(translated_title: &str, locale: crate::Locale) -> String {
    format!("{}-{}", slug::slugify(translated_title), locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Locale;

    #[test]
    fn test_derive_slug_transliterates_cyrillic() {
        let slug = derive_slug("Кількість жив");
        assert!(slug.is_ascii());
        assert!(!slug.contains(' '));
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c == '-'));
    }

    #[test]
    fn test_derive_code_appends_type_id() {
        let code = derive_code("Білий", &EntityId::from("42"));
        assert!(code.ends_with("-42"));
    }

    #[test]
    fn test_codes_differ_across_types_for_same_value() {
        let a = derive_code("Білий", &EntityId::from("1"));
        let b = derive_code("Білий", &EntityId::from("2"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_localized_slug_carries_locale_suffix() {
        let slug = derive_localized_slug("Провод медный", Locale::Ru);
        assert!(slug.ends_with("-ru"));
    }
}
