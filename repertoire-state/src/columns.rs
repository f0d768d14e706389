//! Reading logical fields out of rows whose header text varies between tabs,
//! exports and languages.
//!
//! Column order in the source spreadsheet is stable while header text is not,
//! so every lookup by name is backed by a lookup by column letter.
use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use crate::{Row, text::normalize_key};

/// The zero-based index of a spreadsheet column letter (`A` = 0), if it is `A`..=`Z`.
pub fn column_index(letter: char) -> Option<usize> {
    let letter = letter.to_ascii_uppercase();
    letter
        .is_ascii_uppercase()
        .then(|| (letter as u8 - b'A') as usize)
}

/// Read the cell in column `letter`.
///
/// Positional rows are indexed directly. Keyed rows try, in order, a generated
/// `col{n}` key (1-based), the nth key in source order, and a key equal to the
/// letter itself. Anything unresolvable reads as `""`.
pub fn by_letter(row: &Row, letter: char) -> &str {
    let Some(index) = column_index(letter) else {
        return "";
    };

    match row {
        Row::Positional(cells) => cells.get(index).map(String::as_str).unwrap_or_default(),
        Row::Keyed(pairs) => {
            let generated = format!("col{}", index + 1);
            row.get(&generated)
                .or_else(|| pairs.get(index).map(|(_, v)| v.as_str()))
                .or_else(|| row.get(letter.to_ascii_uppercase().encode_utf8(&mut [0; 4])))
                .unwrap_or_default()
        }
    }
}

/// A field of the works list that the filters read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// The title of the piece.
    Title,
    /// The composer's name.
    Composer,
    /// The publication year.
    Year,
    /// The composer's country.
    Country,
    /// The Soviet republic or region.
    Republic,
    /// The decade of composition.
    Decade,
    /// The type of piece.
    Type,
    /// The composer's gender.
    Gender,
}
impl Field {
    /// Header spellings that hold this field, in priority order.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["Title", "Название"],
            Field::Composer => &["Composer", "Композитор"],
            Field::Year => &["Year", "Published", "Год"],
            Field::Country => &["Country", "Nationality", "Страна"],
            Field::Republic => &[
                "Soviet republic",
                "Soviet",
                "Republic",
                "Republic (EN)",
                "Soviet republic (EN)",
                "Republic/Region",
                "Region",
                "Республика",
            ],
            Field::Decade => &["Decade", "Десятилетие"],
            Field::Type => &["Type", "Type of piece", "Тип"],
            Field::Gender => &["Gender", "Пол"],
        }
    }

    /// The column this field lives in on the works list, where that is fixed.
    pub const fn letter(self) -> Option<char> {
        match self {
            Field::Title => Some('A'),
            Field::Republic => Some('G'),
            Field::Gender => Some('H'),
            Field::Composer => Some('J'),
            Field::Year => Some('K'),
            Field::Country | Field::Decade | Field::Type => None,
        }
    }

    /// Read this field from `row`.
    ///
    /// The first non-empty cell under any alias wins. If an alias header is
    /// present but every such cell is empty, the field is empty; only rows
    /// without any alias header fall back to the column letter.
    pub fn resolve(self, row: &Row) -> &str {
        let mut has_alias_key = false;
        if let Row::Keyed(pairs) = row {
            for alias in self.aliases() {
                let alias = normalize_key(alias);
                for (key, value) in pairs {
                    if normalize_key(key) != alias {
                        continue;
                    }
                    has_alias_key = true;
                    if !value.trim().is_empty() {
                        return value;
                    }
                }
            }
        }
        if has_alias_key {
            return "";
        }
        self.letter()
            .map(|letter| by_letter(row, letter))
            .unwrap_or_default()
    }

    /// Read this field from `row` as the filters see it.
    ///
    /// Identical to [`Field::resolve`], except that a row without a decade of
    /// its own takes the decade of its year.
    pub fn value(self, row: &Row) -> Cow<'_, str> {
        let value = self.resolve(row);
        match self {
            Field::Decade if value.trim().is_empty() => decade_of_year(Field::Year.resolve(row))
                .map(Cow::Owned)
                .unwrap_or(Cow::Borrowed("")),
            _ => Cow::Borrowed(value),
        }
    }
}

/// The decade `year` falls in, such as `1950s` for `1957`.
///
/// Only the leading digits are read, so `1957 (rev. 1962)` is still 1957.
/// Years up to 1800 are treated as noise.
pub fn decade_of_year(year: &str) -> Option<String> {
    let year = year.trim();
    let digits = year
        .find(|c: char| !c.is_ascii_digit())
        .map_or(year, |end| &year[..end]);
    let year: u32 = digits.parse().ok()?;
    (year > 1800).then(|| format!("{}s", year / 10 * 10))
}

/// A field of a composer detail record, named independently of any sheet's headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canonical {
    /// The composer's name.
    Composer,
    /// Birth and death years.
    Lifespan,
    /// Country.
    Country,
    /// Soviet republic.
    SovietRepublic,
    /// Nationality.
    Nationality,
    /// Language.
    Language,
    /// Free-form notes.
    Notes,
    /// A link to further reading.
    LearnMore,
}
impl Canonical {
    /// Every canonical field, in display order.
    pub const ALL: [Canonical; 8] = [
        Canonical::Composer,
        Canonical::Lifespan,
        Canonical::Country,
        Canonical::SovietRepublic,
        Canonical::Nationality,
        Canonical::Language,
        Canonical::Notes,
        Canonical::LearnMore,
    ];

    /// The display name.
    pub const fn name(self) -> &'static str {
        match self {
            Canonical::Composer => "Composer",
            Canonical::Lifespan => "Lifespan",
            Canonical::Country => "Country",
            Canonical::SovietRepublic => "Soviet republic",
            Canonical::Nationality => "Nationality",
            Canonical::Language => "Language",
            Canonical::Notes => "Notes",
            Canonical::LearnMore => "Learn more",
        }
    }

    /// Look a canonical field up by its display name, ignoring case and punctuation.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = normalize_key(name);
        Self::ALL
            .into_iter()
            .find(|c| normalize_key(c.name()) == name)
    }

    /// The header alias table: literal spellings across tabs and languages.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Canonical::Composer => &["Composer", "Композитор", "composer", "Name", "name"],
            Canonical::Lifespan => &["Lifespan", "Life span", "Born", "Died", "Years"],
            Canonical::Country => &["Country", "country", "Страна", "Country of birth", "Nationality"],
            Canonical::SovietRepublic => &["Soviet republic", "Republic", "Soviet"],
            Canonical::Nationality => &["Nationality", "Nationality (EN)"],
            Canonical::Language => &["Language", "language", "Язык"],
            Canonical::Notes => &["Notes", "notes", "Примечания"],
            Canonical::LearnMore => &["Learn more", "Link", "URL"],
        }
    }

    /// The shape a value of this field has, for rows where no header matches.
    fn shape(self) -> Option<&'static Regex> {
        static YEARS: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\b\d{3,4}\s*[–—-]\s*\d{2,4}\b|\b\d{3,4}\b").expect("valid regex")
        });
        static URL: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^\s*https?://\S+").expect("valid regex"));

        match self {
            Canonical::Lifespan => Some(&YEARS),
            Canonical::LearnMore => Some(&URL),
            _ => None,
        }
    }
}

/// Read a canonical field from a row of unknown layout.
///
/// Tries each alias header (non-empty cells only), then the first cell shaped
/// like the field, then the first non-empty cell at all.
pub fn value_for_aliases(row: &Row, canonical: Canonical) -> &str {
    if let Row::Keyed(pairs) = row {
        for alias in canonical.aliases() {
            let alias = normalize_key(alias);
            let found = pairs
                .iter()
                .find(|(key, value)| normalize_key(key) == alias && !value.trim().is_empty());
            if let Some((_, value)) = found {
                return value;
            }
        }
    }

    if let Some(shape) = canonical.shape()
        && let Some(value) = row.values().find(|v| shape.is_match(v))
    {
        return value;
    }

    row.values()
        .find(|v| !v.trim().is_empty())
        .unwrap_or_default()
}
