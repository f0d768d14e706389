use std::collections::{BTreeMap, BTreeSet};

use repertoire_state::{
    Row,
    columns::Field,
    text::{canonical_gender, gender_tokens, normalize},
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A multi-select filter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// The composer's country.
    Country,
    /// The Soviet republic or region.
    Republic,
    /// The decade, given or derived from the year.
    Decade,
    /// The type of piece.
    Type,
    /// The composer's gender, compared as whole tokens.
    Gender,
}
impl Axis {
    /// Every axis, in the order the filters are shown.
    pub const ALL: [Axis; 5] = [
        Axis::Country,
        Axis::Republic,
        Axis::Decade,
        Axis::Type,
        Axis::Gender,
    ];

    /// The row field this axis filters on.
    pub fn field(self) -> Field {
        match self {
            Axis::Country => Field::Country,
            Axis::Republic => Field::Republic,
            Axis::Decade => Field::Decade,
            Axis::Type => Field::Type,
            Axis::Gender => Field::Gender,
        }
    }

    /// The heading shown above this axis's options.
    pub fn label(self) -> &'static str {
        match self {
            Axis::Country => "Country",
            Axis::Republic => "Soviet republic",
            Axis::Decade => "Decade",
            Axis::Type => "Type of piece",
            Axis::Gender => "Gender",
        }
    }
}

/// The filters and page the user has chosen. Replaced wholesale on every
/// change via [`FilterState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free text matched against every cell. Blank means no restriction.
    pub query: String,
    /// Empty when no composer is selected.
    pub selected_composer: String,
    /// An axis with no entry, or an empty set, does not restrict anything.
    pub selections: BTreeMap<Axis, BTreeSet<SmolStr>>,
    /// 1-based.
    pub page: usize,
}
impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected_composer: String::new(),
            selections: BTreeMap::new(),
            page: 1,
        }
    }
}

/// A change to a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Replace the free-text query.
    SetQuery(String),
    /// Only show works by this composer.
    SelectComposer(String),
    /// Show works by every composer.
    ClearComposer,
    /// Check the option if unchecked, uncheck it otherwise.
    Toggle(Axis, SmolStr),
    /// Check exactly these options on the axis.
    SelectAll(Axis, Vec<SmolStr>),
    /// Uncheck every option on the axis.
    ClearAxis(Axis),
    /// Back to the default state.
    ClearAll,
    /// Go to a 1-based page; 0 is read as 1.
    GoToPage(usize),
    NextPage,
    /// Stops at page 1.
    PrevPage,
}

impl FilterState {
    /// The state after `action`. Any change to the filters returns to page 1.
    pub fn apply(self, action: FilterAction) -> FilterState {
        let mut next = self;
        match action {
            FilterAction::SetQuery(query) => {
                next.query = query;
                next.page = 1;
            }
            FilterAction::SelectComposer(name) => {
                next.selected_composer = name;
                next.page = 1;
            }
            FilterAction::ClearComposer => {
                next.selected_composer.clear();
                next.page = 1;
            }
            FilterAction::Toggle(axis, value) => {
                let selected = next.selections.entry(axis).or_default();
                if !selected.remove(&value) {
                    selected.insert(value);
                }
                next.page = 1;
            }
            FilterAction::SelectAll(axis, values) => {
                next.selections.insert(axis, values.into_iter().collect());
                next.page = 1;
            }
            FilterAction::ClearAxis(axis) => {
                next.selections.remove(&axis);
                next.page = 1;
            }
            FilterAction::ClearAll => {
                next = FilterState::default();
            }
            FilterAction::GoToPage(page) => next.page = page.max(1),
            FilterAction::NextPage => next.page = next.page.saturating_add(1),
            FilterAction::PrevPage => next.page = next.page.saturating_sub(1).max(1),
        }
        next
    }

    /// Whether `other` selects the same rows, ignoring the page.
    pub fn same_filters(&self, other: &FilterState) -> bool {
        self.query == other.query
            && self.selected_composer == other.selected_composer
            && self.active_selections().eq(other.active_selections())
    }

    /// The axes that restrict anything, with their selections.
    pub fn active_selections(&self) -> impl Iterator<Item = (Axis, &BTreeSet<SmolStr>)> {
        self.selections
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(axis, values)| (*axis, values))
    }

    /// Convenience for building a state with `values` selected on `axis`.
    pub fn with_selection<S: Into<SmolStr>>(
        mut self,
        axis: Axis,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.selections
            .insert(axis, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        CompiledFilter::new(self).matches(row)
    }
}

/// A [`FilterState`] with its needles normalized once, for evaluation over many rows.
struct CompiledFilter {
    query: String,
    composer: String,
    axes: Vec<(Axis, Vec<String>)>,
}
impl CompiledFilter {
    fn new(state: &FilterState) -> Self {
        Self {
            query: normalize(state.query.trim()),
            composer: normalize(&state.selected_composer),
            axes: state
                .active_selections()
                .map(|(axis, values)| {
                    let fold = match axis {
                        Axis::Gender => canonical_gender,
                        _ => normalize,
                    };
                    (axis, values.iter().map(|v| fold(v)).collect())
                })
                .collect(),
        }
    }

    fn matches(&self, row: &Row) -> bool {
        if !self.query.is_empty() {
            let haystack = normalize(&row.values().collect::<Vec<_>>().join(" "));
            if !haystack.contains(&self.query) {
                return false;
            }
        }

        if !self.composer.is_empty()
            && !normalize(Field::Composer.resolve(row)).contains(&self.composer)
        {
            return false;
        }

        self.axes.iter().all(|(axis, needles)| {
            let value = axis.field().value(row);
            match axis {
                // Gender compares whole canonical tokens, so "male" does not
                // match inside "female" or "transgender".
                Axis::Gender => {
                    let tokens = gender_tokens(&value);
                    needles
                        .iter()
                        .any(|n| !n.is_empty() && tokens.iter().any(|t| t == n))
                }
                _ => {
                    let value = normalize(&value);
                    needles
                        .iter()
                        .any(|n| !n.is_empty() && value.contains(n.as_str()))
                }
            }
        })
    }
}

/// The rows that pass every filter in `state`, in their original order.
pub fn filter_rows<'a>(rows: &'a [Row], state: &FilterState) -> Vec<&'a Row> {
    let filter = CompiledFilter::new(state);
    rows.iter().filter(|row| filter.matches(row)).collect()
}

/// The indices of the rows that pass every filter in `state`.
pub fn filter_indices(rows: &[Row], state: &FilterState) -> Vec<usize> {
    let filter = CompiledFilter::new(state);
    rows.iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(row))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Row> {
        vec![
            Row::keyed([
                ("Composer", "Shostakovich, Dmitri"),
                ("Decade", "1920s"),
                ("Type", "Symphony"),
            ]),
            Row::keyed([
                ("Composer", "Glière, Reinhold"),
                ("Decade", "1930s"),
                ("Type", "Concerto"),
            ]),
        ]
    }

    #[test]
    fn test_decade_filter_end_to_end() {
        let rows = catalog();
        let state = FilterState::default().with_selection(Axis::Decade, ["1920s"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[0]]);
    }

    #[test]
    fn test_decade_filter_reads_the_year_when_decade_is_blank() {
        let rows = vec![
            Row::keyed([("Composer", "Abramyan, Eduard"), ("Year", "1957")]),
            Row::keyed([("Composer", "Arutiunian, Aleksandr"), ("Year", "1962")]),
            Row::keyed([("Composer", "Babadjanian, Arno"), ("Year", "1951"), ("Decade", "1940s")]),
        ];
        let state = FilterState::default().with_selection(Axis::Decade, ["1950s"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[0]]);

        let state = FilterState::default().with_selection(Axis::Decade, ["1940s", "1960s"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[1], &rows[2]]);
    }

    #[test]
    fn test_empty_query_and_selections_exclude_nothing() {
        let rows = catalog();
        assert_eq!(filter_rows(&rows, &FilterState::default()).len(), 2);

        let state = FilterState::default().with_selection::<&str>(Axis::Type, []);
        assert_eq!(filter_rows(&rows, &state).len(), 2);
    }

    #[test]
    fn test_query_is_diacritic_insensitive_over_all_cells() {
        let rows = catalog();
        let state = FilterState::default().apply(FilterAction::SetQuery("GLIERE".into()));
        assert_eq!(filter_rows(&rows, &state), vec![&rows[1]]);

        let state = FilterState::default().apply(FilterAction::SetQuery("symphony".into()));
        assert_eq!(filter_rows(&rows, &state), vec![&rows[0]]);
    }

    #[test]
    fn test_selected_composer_is_containment() {
        let rows = catalog();
        let state =
            FilterState::default().apply(FilterAction::SelectComposer("shostakovich".into()));
        assert_eq!(filter_rows(&rows, &state), vec![&rows[0]]);
    }

    #[test]
    fn test_or_within_axis_and_across_axes() {
        let rows = catalog();
        let state = FilterState::default().with_selection(Axis::Decade, ["1920s", "1930s"]);
        assert_eq!(filter_rows(&rows, &state).len(), 2);

        let state = state.with_selection(Axis::Type, ["concerto"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[1]]);
    }

    #[test]
    fn test_unclassified_rows_are_excluded_by_active_axis() {
        let rows = vec![
            Row::keyed([("Composer", "A"), ("Country", "")]),
            Row::keyed([("Composer", "B"), ("Country", "Armenia")]),
        ];
        let state = FilterState::default().with_selection(Axis::Country, ["Armenia"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[1]]);
    }

    #[test]
    fn test_blank_selection_matches_nothing() {
        let rows = catalog();
        let state = FilterState::default().with_selection(Axis::Decade, [""]);
        assert!(filter_rows(&rows, &state).is_empty());
    }

    #[test]
    fn test_gender_is_exact_token_while_other_axes_are_containment() {
        let rows = vec![
            Row::keyed([("Composer", "A"), ("Gender", "Transgender"), ("Type", "Symphony No. 2")]),
            Row::keyed([("Composer", "B"), ("Gender", "Female"), ("Type", "Symphony")]),
            Row::keyed([("Composer", "C"), ("Gender", "F; M"), ("Type", "Concerto")]),
            Row::keyed([("Composer", "D"), ("Gender", "male"), ("Type", "Concerto")]),
        ];

        // "male" is a substring of "Transgender" and "Female", but not a token of either.
        let state = FilterState::default().with_selection(Axis::Gender, ["male"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[2], &rows[3]]);

        let state = FilterState::default().with_selection(Axis::Gender, ["Female"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[1], &rows[2]]);

        // Type, in contrast, matches by containment.
        let state = FilterState::default().with_selection(Axis::Type, ["symphony"]);
        assert_eq!(filter_rows(&rows, &state), vec![&rows[0], &rows[1]]);
    }

    #[test]
    fn test_positional_rows_use_column_letters() {
        let mut cells = vec![""; 10];
        cells[0] = "Poem";
        cells[6] = "Georgian SSR";
        cells[7] = "F";
        cells[9] = "Tsintsadze, Sulkhan";
        let rows = vec![Row::positional(cells)];

        let state = FilterState::default()
            .with_selection(Axis::Republic, ["georgian"])
            .with_selection(Axis::Gender, ["female"])
            .apply(FilterAction::SelectComposer("Tsintsadze".into()));
        assert_eq!(filter_rows(&rows, &state).len(), 1);
    }

    #[test]
    fn test_apply_resets_page_on_filter_change() {
        let state = FilterState::default().apply(FilterAction::GoToPage(4));
        assert_eq!(state.page, 4);
        let state = state.apply(FilterAction::Toggle(Axis::Decade, "1920s".into()));
        assert_eq!(state.page, 1);
        assert!(state.selections[&Axis::Decade].contains("1920s"));

        let state = state.apply(FilterAction::Toggle(Axis::Decade, "1920s".into()));
        assert!(state.selections[&Axis::Decade].is_empty());
        assert!(state.same_filters(&FilterState::default()));
    }

    #[test]
    fn test_apply_paging_and_clear_all() {
        let state = FilterState::default().apply(FilterAction::PrevPage);
        assert_eq!(state.page, 1);
        let state = state
            .apply(FilterAction::NextPage)
            .apply(FilterAction::NextPage)
            .apply(FilterAction::SetQuery("x".into()))
            .apply(FilterAction::NextPage);
        assert_eq!(state.page, 2);
        assert_eq!(state.apply(FilterAction::ClearAll), FilterState::default());
    }
}
