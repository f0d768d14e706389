//! Plain-text output.
use repertoire_core::{
    ComposerDetail, ComposerGroup, PageView,
    repertoire_state::{
        Row,
        columns::Field,
        options::{FilterOption, OptionLists},
    },
};

pub fn page(view: &PageView) -> String {
    let body = if view.is_empty() {
        "No results.\n".to_string()
    } else {
        let first = view.page.saturating_sub(1) * repertoire_core::PAGE_SIZE + 1;
        view.rows
            .iter()
            .enumerate()
            .map(|(i, row)| format!("{:>4}. {}\n", first + i, summary(row)))
            .collect()
    };

    format!(
        "{body}\n{} results. Page {} of {}  {}\n",
        view.total,
        view.page,
        view.page_count,
        page_buttons(view)
    )
}

/// The page controls: the active page in brackets, with arrows where a
/// neighbouring page exists.
fn page_buttons(view: &PageView) -> String {
    let mut parts = vec![];
    if view.page > 1 {
        parts.push("<".to_string());
    }
    for n in view.buttons.clone() {
        parts.push(if n == view.page {
            format!("[{n}]")
        } else {
            n.to_string()
        });
    }
    if view.page < view.page_count {
        parts.push(">".to_string());
    }
    parts.join(" ")
}

/// `wrap(value)`, or nothing if `value` is empty.
fn unless_empty(value: &str, wrap: impl FnOnce(&str) -> String) -> String {
    if value.is_empty() {
        String::new()
    } else {
        wrap(value)
    }
}

/// One result line: title, composer and year, followed by whichever
/// classifications the row has.
fn summary(row: &Row) -> String {
    let title = Field::Title.resolve(row).trim();
    let title = if title.is_empty() { "(untitled)" } else { title };
    let composer = unless_empty(Field::Composer.resolve(row).trim(), |c| format!(" / {c}"));
    let year = unless_empty(Field::Year.resolve(row).trim(), |y| format!(" ({y})"));

    let tags: Vec<&str> = [Field::Country, Field::Republic, Field::Type, Field::Gender]
        .into_iter()
        .map(|f| f.resolve(row).trim())
        .filter(|v| !v.is_empty())
        .collect();
    let tags = unless_empty(&tags.join(", "), |t| format!(" [{t}]"));

    format!("{title}{composer}{year}{tags}")
}

pub fn composer_detail(detail: &ComposerDetail) -> String {
    let lifespan = unless_empty(&detail.lifespan, |l| format!(" ({l})"));
    let fields: String = detail
        .fields
        .iter()
        .map(|(name, value)| format!("{name}\t{value}\n"))
        .collect();

    format!(
        "{}{lifespan}\nSource: {}\n\nDesired\tValue\n{fields}",
        detail.name, detail.source_table
    )
}

/// The titles of a composer's works, as a section following their details.
pub fn works(group: &ComposerGroup) -> String {
    format!("\nWorks:\n{}", titles(group))
}

fn titles(group: &ComposerGroup) -> String {
    group.titles.iter().map(|t| format!("  {t}\n")).collect()
}

pub fn composer_names(names: &[String]) -> String {
    if names.is_empty() {
        return "No composers.\n".to_string();
    }
    names.iter().map(|n| format!("{n}\n")).collect()
}

/// Each composer with a count of their works, and optionally the titles.
pub fn composer_groups(groups: &[ComposerGroup], with_titles: bool) -> String {
    if groups.is_empty() {
        return "No composers.\n".to_string();
    }
    groups
        .iter()
        .map(|group| {
            let count = group.rows.len();
            let noun = if count == 1 { "work" } else { "works" };
            let titles = if with_titles { titles(group) } else { String::new() };
            format!("{} ({count} {noun})\n{titles}", group.composer)
        })
        .collect()
}

fn option_section(heading: &str, options: &[FilterOption]) -> String {
    let lines: String = if options.is_empty() {
        "  (none)\n".to_string()
    } else {
        options
            .iter()
            .map(|FilterOption { value, label }| {
                if value == label {
                    format!("  {value}\n")
                } else {
                    format!("  {value}\t{label}\n")
                }
            })
            .collect()
    };
    format!("{heading}:\n{lines}")
}

pub fn options(lists: &OptionLists) -> String {
    [
        ("Country", &lists.countries),
        ("Soviet republic", &lists.republics),
        ("Decade", &lists.decades),
        ("Type of piece", &lists.types),
        ("Gender", &lists.genders),
        ("Composer", &lists.composers),
    ]
    .into_iter()
    .map(|(heading, options)| option_section(heading, options))
    .collect()
}

#[cfg(test)]
mod tests {
    use repertoire_core::{FilterAction, FilterSession, FilterState, group_by_composer};

    use super::*;

    fn catalog(count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| {
                Row::keyed([
                    ("Title", format!("Prelude {}", i + 1)),
                    ("Composer", "Abramyan, Eduard".to_string()),
                    ("Year", "1957".to_string()),
                    ("Country", "Armenia".to_string()),
                ])
            })
            .collect()
    }

    #[test]
    fn test_page() {
        let mut session = FilterSession::new(catalog(30), FilterState::default());
        session.dispatch(FilterAction::NextPage);
        let out = page(&session.view());
        assert!(out.starts_with("  26. Prelude 26 / Abramyan, Eduard (1957) [Armenia]\n"));
        assert!(out.ends_with("30 results. Page 2 of 2  < 1 [2]\n"));
    }

    #[test]
    fn test_no_results() {
        let mut session = FilterSession::new(catalog(3), FilterState::default());
        session.dispatch(FilterAction::SetQuery("nocturne".into()));
        assert_eq!(
            page(&session.view()),
            "No results.\n\n0 results. Page 1 of 1  [1]\n"
        );
    }

    #[test]
    fn test_summary_of_a_sparse_row() {
        let row = Row::keyed([("Title", ""), ("Gender", "Female"), ("Country", "Georgia")]);
        assert_eq!(summary(&row), "(untitled) [Georgia, Female]");
    }

    #[test]
    fn test_composer_detail() {
        let detail = ComposerDetail {
            name: "Abramyan, Eduard".into(),
            lifespan: "1923–1986".into(),
            source_table: "CompDet".into(),
            fields: vec![("Composer", "Abramyan, Eduard".into()), ("Notes", "".into())],
        };
        assert_eq!(
            composer_detail(&detail),
            "Abramyan, Eduard (1923–1986)\nSource: CompDet\n\nDesired\tValue\nComposer\tAbramyan, Eduard\nNotes\t\n"
        );
    }

    #[test]
    fn test_composer_groups() {
        let mut rows = catalog(2);
        rows.push(Row::keyed([("Title", "Poem"), ("Composer", "Tsintsadze, Sulkhan")]));
        let groups = group_by_composer(&rows);

        assert_eq!(
            composer_groups(&groups, false),
            "Abramyan, Eduard (2 works)\nTsintsadze, Sulkhan (1 work)\n"
        );
        assert_eq!(
            composer_groups(&groups, true),
            "Abramyan, Eduard (2 works)\n  Prelude 1\n  Prelude 2\nTsintsadze, Sulkhan (1 work)\n  Poem\n"
        );
        assert_eq!(works(&groups[1]), "\nWorks:\n  Poem\n");
        assert_eq!(composer_groups(&[], true), "No composers.\n");
    }

    #[test]
    fn test_options_show_labels_only_when_localized() {
        let lists = OptionLists {
            countries: vec![FilterOption {
                value: "Armenia".into(),
                label: "Армения".into(),
            }],
            genders: vec![FilterOption {
                value: "Male".into(),
                label: "Male".into(),
            }],
            ..Default::default()
        };
        let out = options(&lists);
        assert!(out.contains("Country:\n  Armenia\tАрмения\n"));
        assert!(out.contains("Decade:\n  (none)\n"));
        assert!(out.contains("Gender:\n  Male\n"));
        assert!(out.ends_with("Composer:\n  (none)\n"));
    }
}
