//! The catalog's rows and how to read them: fetching with fallback, folding text
//! for comparison, resolving fields through header aliases and column letters,
//! and recognising which sheet holds what.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

pub use repertoire_sheets as rs;
pub use repertoire_sheets::{
    Client, ClientError, ClientResult, Row, SheetRequest, SheetResponse, Translations,
};

pub mod classify;
pub mod columns;
pub mod options;
pub mod text;

mod fetch;
pub use fetch::{
    DEFAULT_RANGE, DEFAULT_SHEET, FetchError, SheetApi, export_rows, fetch_option_lists, fetch_rows,
    fetch_table, response_rows,
};
