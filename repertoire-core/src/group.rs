//! Works grouped under their composers.
use std::collections::HashMap;

use repertoire_state::{
    Row,
    columns::Field,
    text::{clean_cell, normalize},
};
use serde::Serialize;

/// The group of works whose composer cell is blank.
pub const UNKNOWN_COMPOSER: &str = "Unknown";

/// The header of the combined title column, preferred over the plain title.
const TITLE_WITH_YEAR: &str = "Title, Year";

/// The works of one composer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposerGroup<'a> {
    pub composer: String,
    pub rows: Vec<&'a Row>,
    /// Distinct, non-empty titles in the order they first appear.
    pub titles: Vec<String>,
}

/// Group `rows` by their cleaned composer cell. Groups are in the order their
/// composer first appears.
pub fn group_by_composer<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<ComposerGroup<'a>> {
    let mut groups: Vec<ComposerGroup<'a>> = vec![];
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let mut composer = clean_cell(Field::Composer.resolve(row));
        if composer.is_empty() {
            composer = UNKNOWN_COMPOSER.to_string();
        }
        let i = *index.entry(composer.clone()).or_insert_with(|| {
            groups.push(ComposerGroup {
                composer,
                rows: vec![],
                titles: vec![],
            });
            groups.len() - 1
        });

        let group = &mut groups[i];
        group.rows.push(row);
        let title = listed_title(row);
        if !title.is_empty() && !group.titles.contains(&title) {
            group.titles.push(title);
        }
    }
    groups
}

fn listed_title(row: &Row) -> String {
    let combined = row.get(TITLE_WITH_YEAR).map(clean_cell).unwrap_or_default();
    if combined.is_empty() {
        clean_cell(Field::Title.resolve(row))
    } else {
        combined
    }
}

/// The group a composer name refers to.
///
/// Names are compared normalized. A group matches if either name contains the
/// other, or if they share a word.
pub fn find_group<'g, 'a>(groups: &'g [ComposerGroup<'a>], name: &str) -> Option<&'g ComposerGroup<'a>> {
    let target = normalize(name.trim());
    if target.is_empty() {
        return None;
    }
    let target_words = words(&target);

    let found = groups.iter().find(|group| {
        let candidate = normalize(&group.composer);
        !candidate.is_empty()
            && (candidate.contains(&target)
                || target.contains(candidate.as_str())
                || words(&candidate).iter().any(|w| target_words.contains(w)))
    });
    if found.is_none() {
        tracing::debug!(
            "no composer group for {name:?}, candidates: {:?}",
            groups.iter().take(30).map(|g| &g.composer).collect::<Vec<_>>()
        );
    }
    found
}

/// The words of `s`: runs of letters and digits, normalized.
fn words(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(normalize)
        .collect()
}
