pub mod filter;
pub mod group;
pub mod live;
pub mod paginate;
pub mod resolver;
pub mod session;

pub use filter::{Axis, FilterAction, FilterState, filter_rows};
pub use group::{ComposerGroup, UNKNOWN_COMPOSER, find_group, group_by_composer};
pub use live::LiveUpdates;
pub use paginate::{MAX_PAGE_BUTTONS, PAGE_SIZE, page_button_range, page_count, paginate};
pub use resolver::{
    ComposerDetail, ComposerMatch, DEFAULT_CANDIDATE_TABLES, ResolveError, SheetSource,
    resolve_composer,
};
pub use session::{FilterSession, PageView};

pub use repertoire_state;
