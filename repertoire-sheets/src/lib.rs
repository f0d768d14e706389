//! A barebones client for the catalog's spreadsheet proxy and its public export.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod row;
pub use row::*;

mod sheet;
pub use sheet::*;

mod export;
pub use export::*;

mod translations;
pub use translations::*;

mod request;
