use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult};

/// The option lists for one locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleOptions {
    /// Country names.
    pub countries: Vec<String>,
    /// Decade labels, such as `1920s`.
    pub decades: Vec<String>,
    /// Types of piece.
    pub types: Vec<String>,
}

/// The contents of `/i18n/translations.json`, keyed by locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(pub HashMap<String, LocaleOptions>);
impl Translations {
    /// The locale whose lists define the canonical option values.
    pub const CANONICAL_LOCALE: &str = "en";

    /// The option lists for `locale`.
    pub fn locale(&self, locale: &str) -> Option<&LocaleOptions> {
        self.0.get(locale)
    }

    /// The canonical (English) option lists.
    pub fn canonical(&self) -> Option<&LocaleOptions> {
        self.locale(Self::CANONICAL_LOCALE)
    }
}

/// Translation-related functionality.
impl Client {
    /// Fetch the localized option lists.
    pub async fn translations(&self) -> ClientResult<Translations> {
        self.request("i18n/translations.json", &[]).await
    }
}
