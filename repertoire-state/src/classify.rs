//! Guessing what a sheet holds from its header keys.
use crate::{Row, text::normalize_key};

/// What a set of header keys suggests about a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderProfile {
    /// A key names the composer.
    pub has_composer: bool,
    /// A key names a lifespan, birth or death.
    pub has_lifespan: bool,
    /// A key names a country, republic or nationality.
    pub has_country: bool,
    /// A key is one of the works list's own columns.
    pub looks_like_works_list: bool,
}
impl HeaderProfile {
    const COMPOSER: &[&str] = &["composer", "композитор"];
    const LIFESPAN: &[&str] = &["lifespan", "life", "born", "died", "years"];
    const COUNTRY: &[&str] = &["country", "republic", "nationality", "soviet"];
    const WORKS_LIST: &[&str] = &["title", "compositions", "snippet", "published"];

    /// Profile a set of header keys.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut profile = Self::default();
        for key in keys {
            let key = normalize_key(key);
            let contains_any = |words: &[&str]| words.iter().any(|w| key.contains(w));
            profile.has_composer |= contains_any(Self::COMPOSER);
            profile.has_lifespan |= contains_any(Self::LIFESPAN);
            profile.has_country |= contains_any(Self::COUNTRY);
            profile.looks_like_works_list |= Self::WORKS_LIST.contains(&key.as_str());
        }
        profile
    }

    /// Profile the header keys of a row.
    pub fn from_row(row: &Row) -> Self {
        Self::from_keys(row.keys())
    }

    /// Whether these headers look like a table of composer metadata: a composer
    /// column plus a lifespan or country column, and none of the works list's columns.
    pub fn is_composer_metadata(&self) -> bool {
        self.has_composer && (self.has_lifespan || self.has_country) && !self.looks_like_works_list
    }
}

/// Whether a table whose first record is `sample` holds composer metadata.
pub fn looks_like_composer_metadata(sample: &Row) -> bool {
    HeaderProfile::from_row(sample).is_composer_metadata()
}

/// The first header key that names the composer.
pub fn composer_key(sample: &Row) -> Option<&str> {
    sample.keys().find(|key| {
        let key = normalize_key(key);
        HeaderProfile::COMPOSER.iter().any(|w| key.contains(w))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composer_details_headers() {
        let profile = HeaderProfile::from_keys(["Composer", "Lifespan", "Country", "Notes"]);
        assert!(profile.is_composer_metadata());

        let profile = HeaderProfile::from_keys(["Композитор", "Soviet republic"]);
        assert!(profile.has_composer && profile.has_country && !profile.has_lifespan);
        assert!(profile.is_composer_metadata());

        assert!(HeaderProfile::from_keys(["Composer name", "Years of life"]).is_composer_metadata());
    }

    #[test]
    fn test_works_list_headers_are_rejected() {
        let keys = ["Title", "Composer", "Published", "Soviet republic", "Gender"];
        let profile = HeaderProfile::from_keys(keys);
        assert!(profile.looks_like_works_list);
        assert!(!profile.is_composer_metadata());
    }

    #[test]
    fn test_title_must_match_whole_key() {
        // "Title of honour" is not the works list's title column.
        let profile = HeaderProfile::from_keys(["Composer", "Born", "Title of honour"]);
        assert!(!profile.looks_like_works_list);
        assert!(profile.is_composer_metadata());
    }

    #[test]
    fn test_incomplete_headers_are_rejected() {
        assert!(!HeaderProfile::from_keys(["Composer", "Notes"]).is_composer_metadata());
        assert!(!HeaderProfile::from_keys(["Country", "Born"]).is_composer_metadata());
        assert!(!HeaderProfile::from_keys([]).is_composer_metadata());
        assert!(!looks_like_composer_metadata(&Row::positional(["Composer", "Born"])));
    }

    #[test]
    fn test_composer_key() {
        let row = Row::keyed([("Name", "x"), ("Composer (EN)", "y"), ("Composer", "z")]);
        assert_eq!(composer_key(&row), Some("Composer (EN)"));
        assert_eq!(composer_key(&Row::keyed([("Name", "x")])), None);
    }
}
