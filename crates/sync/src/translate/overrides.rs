//! Tenant-specific terminology corrections.
//!
//! Two kinds of entries per locale pair:
//!
//! - *fixed terms*: a source term that must always map to one exact
//!   counterpart, bypassing the provider entirely;
//! - *corrections*: a known provider mistranslation rewritten to the
//!   canonical term after the call.
//!
//! The table is configurable rather than inlined because it encodes store
//! terminology, not engine logic.

use std::collections::HashMap;

use catalog_core::{Locale, LocalePair};

type PairKey = (Locale, Locale);

/// Override table applied by the translation gateway.
#[derive(Debug, Clone)]
pub struct TermOverrides {
    fixed: HashMap<PairKey, Vec<(String, String)>>,
    corrections: HashMap<PairKey, Vec<(String, String)>>,
}

impl TermOverrides {
    /// An empty table (no overrides at all).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            fixed: HashMap::new(),
            corrections: HashMap::new(),
        }
    }

    /// Register a bidirectional fixed term: `a` in `a_locale` always maps
    /// to `b` in `b_locale` and vice versa.
    pub fn fix_term(&mut self, a_locale: Locale, a: &str, b_locale: Locale, b: &str) {
        self.fixed
            .entry((a_locale, b_locale))
            .or_default()
            .push((a.to_string(), b.to_string()));
        self.fixed
            .entry((b_locale, a_locale))
            .or_default()
            .push((b.to_string(), a.to_string()));
    }

    /// Register a post-translation correction for one locale pair.
    pub fn correct_term(&mut self, pair: LocalePair, wrong: &str, right: &str) {
        self.corrections
            .entry((pair.source, pair.target))
            .or_default()
            .push((wrong.to_string(), right.to_string()));
    }

    /// The fixed counterpart of `text` for this pair, if one is registered.
    #[must_use]
    pub fn fixed_term(&self, text: &str, pair: LocalePair) -> Option<&str> {
        self.fixed
            .get(&(pair.source, pair.target))?
            .iter()
            .find(|(source, _)| source == text.trim())
            .map(|(_, target)| target.as_str())
    }

    /// Rewrite a known mistranslation to its canonical term.
    #[must_use]
    pub fn correct(&self, translated: &str, pair: LocalePair) -> String {
        if let Some(entries) = self.corrections.get(&(pair.source, pair.target))
            && let Some((_, right)) = entries.iter().find(|(wrong, _)| wrong == translated)
        {
            return right.clone();
        }
        translated.to_string()
    }
}

impl Default for TermOverrides {
    /// The store's standing cable-terminology corrections.
    fn default() -> Self {
        let mut table = Self::empty();
        table.fix_term(Locale::Uk, "Кількість жив", Locale::Ru, "Количество жил");
        table.fix_term(Locale::Uk, "Перетин жив", Locale::Ru, "Сечение жил");
        if let Ok(pair) = LocalePair::new(Locale::Uk, Locale::Ru) {
            table.correct_term(pair, "Количество живых", "Количество жил");
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uk_ru() -> LocalePair {
        LocalePair::new(Locale::Uk, Locale::Ru).unwrap_or_else(|e| unreachable!("{e}"))
    }

    #[test]
    fn test_fixed_term_both_directions() {
        let table = TermOverrides::default();
        assert_eq!(
            table.fixed_term("Кількість жив", uk_ru()),
            Some("Количество жил")
        );
        assert_eq!(
            table.fixed_term("Количество жил", uk_ru().flip()),
            Some("Кількість жив")
        );
    }

    #[test]
    fn test_fixed_term_wrong_pair_is_none() {
        let table = TermOverrides::default();
        let uk_en = LocalePair::new(Locale::Uk, Locale::En).unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(table.fixed_term("Кількість жив", uk_en), None);
    }

    #[test]
    fn test_correction_rewrites_known_mistranslation() {
        let table = TermOverrides::default();
        assert_eq!(table.correct("Количество живых", uk_ru()), "Количество жил");
        assert_eq!(table.correct("Белый", uk_ru()), "Белый");
    }

    #[test]
    fn test_empty_table_passes_everything_through() {
        let table = TermOverrides::empty();
        assert_eq!(table.fixed_term("Кількість жив", uk_ru()), None);
        assert_eq!(table.correct("Количество живых", uk_ru()), "Количество живых");
    }
}
