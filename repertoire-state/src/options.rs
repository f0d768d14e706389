//! The option lists offered by each filter axis.
use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Row, Translations, columns::Field};

/// Countries offered when the translations are unavailable.
pub const FALLBACK_COUNTRIES: &[&str] = &[
    "Russia",
    "Ukraine",
    "Belarus",
    "Armenia",
    "Georgia",
    "Latvia",
    "Estonia",
    "Lithuania",
    "Kazakhstan",
    "Uzbekistan",
    "Other",
];

/// Decades offered when the translations are unavailable.
pub const FALLBACK_DECADES: &[&str] = &[
    "1920s", "1930s", "1940s", "1950s", "1960s", "1970s", "1980s",
];

/// The genders offered.
pub const GENDERS: &[&str] = &["Male", "Female", "Other"];

/// One checkbox: the canonical value that is filtered on, and the label shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// The canonical (English) value.
    pub value: String,
    /// The label in the current locale.
    pub label: String,
}

/// The options of every filter axis, for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionLists {
    /// Countries.
    pub countries: Vec<FilterOption>,
    /// Soviet republics and regions.
    pub republics: Vec<FilterOption>,
    /// Decades.
    pub decades: Vec<FilterOption>,
    /// Types of piece.
    pub types: Vec<FilterOption>,
    /// Genders.
    pub genders: Vec<FilterOption>,
    /// Every composer in the works list.
    pub composers: Vec<FilterOption>,
}
impl OptionLists {
    /// Build the option lists.
    ///
    /// Each list comes from the translations where they have it, and degrades
    /// independently otherwise: countries to a fixed list, decades to those
    /// found in `rows` (or a fixed list when there are none), types to the
    /// distinct values found in `rows`. Republics and composers always come
    /// from `rows`.
    pub fn build(translations: Option<&Translations>, locale: &str, rows: &[Row]) -> Self {
        let canonical = translations.and_then(|t| t.canonical());
        let localized = translations.and_then(|t| t.locale(locale));

        let countries = match canonical.filter(|c| !c.countries.is_empty()) {
            Some(c) => localize(&c.countries, localized.map(|l| l.countries.as_slice())),
            None => unlocalized(FALLBACK_COUNTRIES.iter().copied()),
        };
        let decades = match canonical.filter(|c| !c.decades.is_empty()) {
            Some(c) => localize(&c.decades, localized.map(|l| l.decades.as_slice())),
            None => {
                let found = distinct_values(rows, Field::Decade);
                if found.is_empty() {
                    unlocalized(FALLBACK_DECADES.iter().copied())
                } else {
                    unlocalized(found.iter().map(String::as_str))
                }
            }
        };
        let types = match canonical.filter(|c| !c.types.is_empty()) {
            Some(c) => localize(&c.types, localized.map(|l| l.types.as_slice())),
            None => unlocalized(distinct_values(rows, Field::Type).iter().map(String::as_str)),
        };

        Self {
            countries,
            republics: unlocalized(
                distinct_values(rows, Field::Republic)
                    .iter()
                    .map(String::as_str),
            ),
            decades,
            types,
            genders: unlocalized(GENDERS.iter().copied()),
            composers: unlocalized(composers(rows).iter().map(String::as_str)),
        }
    }
}

/// Pair canonical values with the label at the same index in the localized
/// list, or with themselves where the localized list is missing or short.
pub fn localize(canonical: &[String], localized: Option<&[String]>) -> Vec<FilterOption> {
    canonical
        .iter()
        .enumerate()
        .map(|(i, value)| FilterOption {
            value: value.clone(),
            label: localized
                .and_then(|l| l.get(i))
                .filter(|l| !l.is_empty())
                .unwrap_or(value)
                .clone(),
        })
        .collect()
}

fn unlocalized<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<FilterOption> {
    values
        .into_iter()
        .map(|v| FilterOption {
            value: v.to_string(),
            label: v.to_string(),
        })
        .collect()
}

/// The distinct, trimmed, non-empty values of `field` across `rows`, in collation order.
///
/// Values are read with [`Field::value`], so decades include those derived from years.
pub fn distinct_values(rows: &[Row], field: Field) -> Vec<String> {
    let set: BTreeSet<String> = rows
        .iter()
        .map(|row| field.value(row).trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    let mut values: Vec<String> = set.into_iter().collect();
    sort_collated(&mut values);
    values
}

/// Every composer named in `rows`, once each, in collation order.
pub fn composers<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<String> {
    let set: BTreeSet<String> = rows
        .into_iter()
        .map(|row| Field::Composer.resolve(row).trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    let mut values: Vec<String> = set.into_iter().collect();
    sort_collated(&mut values);
    values
}

/// Sort strings the way a reader expects: case- and accent-insensitive, with
/// numbers compared by value.
pub fn sort_collated(values: &mut [String]) {
    let mut collator_preferences = icu_collator::CollatorPreferences::default();
    collator_preferences.numeric_ordering =
        Some(icu_collator::preferences::CollationNumericOrdering::True);

    let mut collator_options = icu_collator::options::CollatorOptions::default();
    collator_options.strength = Some(icu_collator::options::Strength::Primary);
    collator_options.case_level = Some(icu_collator::options::CaseLevel::Off);

    match icu_collator::Collator::try_new(collator_preferences, collator_options) {
        Ok(collator) => values.sort_by(|a, b| collator.compare(a, b)),
        Err(e) => {
            tracing::warn!("failed to create collator, sorting bytewise: {e}");
            values.sort();
        }
    }
}
