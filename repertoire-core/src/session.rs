use std::ops::RangeInclusive;

use repertoire_state::Row;
use serde::Serialize;

use crate::{
    MAX_PAGE_BUTTONS, PAGE_SIZE,
    filter::{FilterAction, FilterState, filter_indices},
    paginate::{page_button_range, page_count, paginate},
};

/// A fingerprint of a row collection, used to tell whether a refetch changed anything.
pub fn fingerprint(rows: &[Row]) -> String {
    serde_json::to_string(rows).unwrap_or_default()
}

/// The loaded rows together with the user's filter state, keeping the filtered
/// view in step with both.
#[derive(Debug, Clone)]
pub struct FilterSession {
    rows: Vec<Row>,
    fingerprint: String,
    state: FilterState,
    /// Indices into `rows`, in order.
    filtered: Vec<usize>,
    page_size: usize,
}

/// One page of a [`FilterSession`], ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Row>,
    /// The number of rows that passed the filters, across all pages.
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub buttons: RangeInclusive<usize>,
}
impl PageView<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FilterSession {
    pub fn new(rows: Vec<Row>, state: FilterState) -> Self {
        let filtered = filter_indices(&rows, &state);
        Self {
            fingerprint: fingerprint(&rows),
            rows,
            state,
            filtered,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The rows that pass the current filters, across all pages.
    pub fn filtered(&self) -> impl Iterator<Item = &Row> {
        self.filtered.iter().map(|&i| &self.rows[i])
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered.len(), self.page_size)
    }

    /// Apply `action`. Paging is clamped to the pages that exist.
    pub fn dispatch(&mut self, action: FilterAction) {
        let paging = matches!(
            action,
            FilterAction::GoToPage(_) | FilterAction::NextPage | FilterAction::PrevPage
        );
        let previous = std::mem::take(&mut self.state);
        let mut next = previous.clone().apply(action);
        if !next.same_filters(&previous) {
            self.filtered = filter_indices(&self.rows, &next);
        }
        if paging {
            next.page = next.page.min(self.page_count());
        }
        self.state = next;
    }

    /// Replace the loaded rows. Returns `false`, leaving everything as it was,
    /// if the new rows are identical to the current ones.
    ///
    /// With `reset_page`, the view returns to page 1; otherwise the page is
    /// kept even if it no longer exists.
    pub fn replace_rows(&mut self, rows: Vec<Row>, reset_page: bool) -> bool {
        let fingerprint = fingerprint(&rows);
        if fingerprint == self.fingerprint {
            return false;
        }
        tracing::info!(
            "rows changed: {} -> {} rows",
            self.rows.len(),
            rows.len()
        );

        self.filtered = filter_indices(&rows, &self.state);
        self.rows = rows;
        self.fingerprint = fingerprint;
        if reset_page {
            self.state.page = 1;
        }
        true
    }

    /// The current page.
    pub fn view(&self) -> PageView<'_> {
        let page = self.state.page;
        let page_count = self.page_count();
        PageView {
            rows: paginate(&self.filtered, self.page_size, page)
                .iter()
                .map(|&i| &self.rows[i])
                .collect(),
            total: self.filtered.len(),
            page,
            page_count,
            buttons: page_button_range(page_count, page, MAX_PAGE_BUTTONS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Axis;

    fn numbered(count: usize, decade: &str) -> Vec<Row> {
        (0..count)
            .map(|i| {
                Row::keyed([
                    ("Title", format!("Piece {i}")),
                    ("Composer", "Composer".to_string()),
                    ("Decade", decade.to_string()),
                ])
            })
            .collect()
    }

    #[test]
    fn test_view_pages() {
        let mut session = FilterSession::new(numbered(60, "1950s"), FilterState::default());
        let view = session.view();
        assert_eq!(view.rows.len(), 25);
        assert_eq!(view.total, 60);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.buttons, 1..=3);

        session.dispatch(FilterAction::GoToPage(3));
        let view = session.view();
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.rows[0].get("Title"), Some("Piece 50"));
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut session = FilterSession::new(numbered(60, "1950s"), FilterState::default());
        session.dispatch(FilterAction::GoToPage(9));
        assert_eq!(session.state().page, 3);
        session.dispatch(FilterAction::NextPage);
        assert_eq!(session.state().page, 3);
        session.dispatch(FilterAction::PrevPage);
        assert_eq!(session.state().page, 2);
    }

    #[test]
    fn test_filter_change_returns_to_first_page() {
        let mut rows = numbered(40, "1950s");
        rows.extend(numbered(5, "1960s"));
        let mut session = FilterSession::new(rows, FilterState::default());
        session.dispatch(FilterAction::NextPage);
        assert_eq!(session.state().page, 2);

        session.dispatch(FilterAction::Toggle(Axis::Decade, "1960s".into()));
        assert_eq!(session.state().page, 1);
        assert_eq!(session.view().total, 5);
        assert_eq!(session.filtered().count(), 5);
    }

    #[test]
    fn test_no_results() {
        let mut session = FilterSession::new(numbered(3, "1950s"), FilterState::default());
        session.dispatch(FilterAction::SetQuery("nothing like this".into()));
        let view = session.view();
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
        assert_eq!(view.page_count, 1);
    }

    #[test]
    fn test_replace_rows_detects_changes() {
        let mut session = FilterSession::new(numbered(60, "1950s"), FilterState::default());
        session.dispatch(FilterAction::GoToPage(2));

        assert!(!session.replace_rows(numbered(60, "1950s"), true));
        assert_eq!(session.state().page, 2);

        // Kept, even though page 2 no longer exists.
        assert!(session.replace_rows(numbered(10, "1950s"), false));
        assert_eq!(session.state().page, 2);
        assert!(session.view().is_empty());

        assert!(session.replace_rows(numbered(30, "1950s"), true));
        assert_eq!(session.state().page, 1);
        assert_eq!(session.view().total, 30);
    }
}
