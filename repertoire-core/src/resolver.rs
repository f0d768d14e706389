//! Finding a composer's details by searching the sheets that might hold them.
use std::future::Future;

use repertoire_state::{
    Client, FetchError, Row,
    classify::{composer_key, looks_like_composer_metadata},
    columns::{Canonical, value_for_aliases},
    text::{clean_cell, normalize},
};
use serde::Serialize;

/// The sheets searched for composer details, in priority order: the aggregated
/// works list first, then the composer detail tabs the spreadsheet has used.
pub const DEFAULT_CANDIDATE_TABLES: &[&str] = &[
    "MusicList",
    "CompDet",
    "Sheet2",
    "ComposersAggregated",
    "Composers",
    "Aggregated",
];

/// Something that can load a named table.
pub trait SheetSource {
    type Error: std::fmt::Display;

    fn fetch_table(&self, name: &str) -> impl Future<Output = Result<Vec<Row>, Self::Error>>;
}

/// Tables are read through the proxy, falling back to the public export when
/// the proxy fails in any way.
impl SheetSource for Client {
    type Error = FetchError;

    async fn fetch_table(&self, name: &str) -> Result<Vec<Row>, FetchError> {
        repertoire_state::fetch_table(self, name).await
    }
}

/// A composer record and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerMatch {
    pub record: Row,
    pub source_table: String,
    /// The cell whose value matched the requested name.
    pub matched_value: String,
}

/// A composer record laid out for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposerDetail {
    pub name: String,
    pub lifespan: String,
    pub source_table: String,
    /// Every canonical field, in display order.
    pub fields: Vec<(&'static str, String)>,
}
impl ComposerMatch {
    pub fn detail(&self) -> ComposerDetail {
        let fields: Vec<_> = Canonical::ALL
            .into_iter()
            .map(|c| (c.name(), clean_cell(value_for_aliases(&self.record, c))))
            .collect();
        let lifespan = clean_cell(value_for_aliases(&self.record, Canonical::Lifespan));

        ComposerDetail {
            name: clean_cell(&self.matched_value),
            lifespan,
            source_table: self.source_table.clone(),
            fields,
        }
    }
}

/// Why no composer record was found.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// No name was given.
    EmptyName,
    /// None of the candidate tables looks like composer metadata.
    NotLocated { tried: Vec<String> },
    /// A composer table was found, but nothing in it matches the name.
    NoMatch {
        name: String,
        source_table: String,
        /// The header keys of the table's first record.
        sample_keys: Vec<String>,
        /// The table's first record, as pretty-printed JSON.
        sample: String,
    },
}
impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::EmptyName => write!(f, "Select a result to view composer details."),
            ResolveError::NotLocated { tried } => write!(
                f,
                "No composer detail sheet could be located. Tried: {}.",
                tried.join(", ")
            ),
            ResolveError::NoMatch {
                name,
                source_table,
                sample_keys,
                ..
            } => write!(
                f,
                "No composer match in {source_table} for {name}. Sample headers: {}",
                sample_keys.join(", ")
            ),
        }
    }
}
impl std::error::Error for ResolveError {}

/// Find the details of composer `name`.
///
/// Candidates are tried one at a time, in order. Tables that fail to load,
/// are empty, or do not look like composer metadata are skipped. Within a
/// table the composer column is searched first, then every cell. The first
/// table with a match wins.
pub async fn resolve_composer<S: SheetSource>(
    source: &S,
    name: &str,
    candidates: &[&str],
) -> Result<ComposerMatch, ResolveError> {
    let target = normalize(name.trim());
    if target.is_empty() {
        return Err(ResolveError::EmptyName);
    }

    let mut first_accepted: Option<(&str, Row)> = None;
    for &table in candidates {
        let rows = match source.fetch_table(table).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::debug!("candidate table {table} failed to load: {e}");
                continue;
            }
        };
        let Some(sample) = rows.first() else {
            tracing::debug!("candidate table {table} is empty");
            continue;
        };
        if !looks_like_composer_metadata(sample) {
            tracing::debug!(
                "rejected candidate table {table}, headers: {:?}",
                sample.keys().collect::<Vec<_>>()
            );
            continue;
        }
        tracing::debug!("accepted candidate table {table}");

        if let Some((record, matched_value)) = find_in_table(&rows, &target) {
            return Ok(ComposerMatch {
                record: record.clone(),
                source_table: table.to_string(),
                matched_value: matched_value.trim().to_string(),
            });
        }
        if first_accepted.is_none() {
            first_accepted = Some((table, sample.clone()));
        }
    }

    match first_accepted {
        Some((source_table, sample)) => Err(ResolveError::NoMatch {
            name: name.to_string(),
            source_table: source_table.to_string(),
            sample_keys: sample.keys().map(str::to_string).collect(),
            sample: serde_json::to_string_pretty(&sample).unwrap_or_default(),
        }),
        None => Err(ResolveError::NotLocated {
            tried: candidates.iter().map(|c| c.to_string()).collect(),
        }),
    }
}

/// Equal, containing, or contained: either name may be the fuller form.
fn names_match(value: &str, target: &str) -> bool {
    let value = normalize(value.trim());
    !value.is_empty() && (value.contains(target) || target.contains(value.as_str()))
}

/// The first record whose composer cell matches, or failing that, the first
/// record with any matching cell.
fn find_in_table<'a>(rows: &'a [Row], target: &str) -> Option<(&'a Row, &'a str)> {
    let by_composer = rows.first().and_then(composer_key).and_then(|key| {
        rows.iter().find_map(|row| {
            row.get(key)
                .filter(|v| names_match(v, target))
                .map(|v| (row, v))
        })
    });

    by_composer.or_else(|| {
        rows.iter().find_map(|row| {
            row.values()
                .find(|v| names_match(v, target))
                .map(|v| (row, v))
        })
    })
}
