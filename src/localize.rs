//! Localised field resolution.
//!
//! Categories carry one translation row per language. Lookups resolve the
//! preferred language first, then English, then the first non-empty entry.
//! The same order is used for every localised field.

use crate::language::Language;

/// Pick the best entry from a localised (language, value) set.
#[must_use]
pub fn resolve<'a>(entries: &'a [(Language, String)], preferred: Language) -> Option<&'a str> {
    lookup(entries, preferred)
        .or_else(|| lookup(entries, Language::En))
        .or_else(|| {
            entries
                .iter()
                .map(|(_, value)| value.as_str())
                .find(|value| !value.is_empty())
        })
}

fn lookup(entries: &[(Language, String)], language: Language) -> Option<&str> {
    entries
        .iter()
        .find(|(lang, value)| *lang == language && !value.is_empty())
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<(Language, String)> {
        vec![
            (Language::En, "Science".to_owned()),
            (Language::Ru, "Наука".to_owned()),
        ]
    }

    #[test]
    fn prefers_requested_language() {
        assert_eq!(resolve(&entries(), Language::Ru), Some("Наука"));
    }

    #[test]
    fn falls_back_to_english() {
        let only_en = vec![(Language::En, "Science".to_owned())];
        assert_eq!(resolve(&only_en, Language::Ru), Some("Science"));
    }

    #[test]
    fn falls_back_to_any_non_empty() {
        let only_ru = vec![(Language::Ru, "Наука".to_owned())];
        assert_eq!(resolve(&only_ru, Language::En), Some("Наука"));
    }

    #[test]
    fn empty_values_are_skipped() {
        let blank = vec![
            (Language::En, String::new()),
            (Language::Ru, "Наука".to_owned()),
        ];
        assert_eq!(resolve(&blank, Language::En), Some("Наука"));
    }

    #[test]
    fn no_entries_resolves_to_none() {
        assert_eq!(resolve(&[], Language::En), None);
    }
}
