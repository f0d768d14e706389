use std::future::Future;

use crate::{
    Client, ClientError, ClientResult, Row, SheetRequest, SheetResponse,
    options::OptionLists,
    rs::ExportTable,
};

/// The sheet read when a request does not name one.
pub const DEFAULT_SHEET: &str = "MusicList";
/// The range read from the public export when a request does not give one.
pub const DEFAULT_RANGE: &str = "A1:Z1000";

/// The two ways a sheet can be read: through the proxy, or from the public export.
///
/// Implemented by [`Client`]; the fetch functions are written against this so
/// the fallback rules can be exercised without a network.
pub trait SheetApi {
    /// Read a sheet through `/api/sheets`.
    fn sheet(&self, request: &SheetRequest) -> impl Future<Output = ClientResult<SheetResponse>>;
    /// Read a sheet from the public export.
    fn export(&self, sheet: &str, range: &str) -> impl Future<Output = ClientResult<ExportTable>>;
}
impl SheetApi for Client {
    async fn sheet(&self, request: &SheetRequest) -> ClientResult<SheetResponse> {
        Client::sheet(self, request).await
    }

    async fn export(&self, sheet: &str, range: &str) -> ClientResult<ExportTable> {
        Client::export(self, sheet, range).await
    }
}

#[derive(Debug)]
/// Why a row collection could not be loaded.
pub enum FetchError {
    /// The proxy could not be reached or read.
    Unavailable(ClientError),
    /// The proxy answered with something other than rows, and the public
    /// export could not stand in for it either.
    UnexpectedShape {
        /// The proxy's response, as text.
        response: String,
        /// Why the public export failed.
        fallback: ClientError,
    },
    /// Neither the proxy nor the public export could be read.
    Unreachable {
        /// Why the proxy failed.
        primary: ClientError,
        /// Why the public export failed.
        fallback: ClientError,
    },
}
impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Unavailable(e) => write!(f, "Load failed: {e}"),
            FetchError::UnexpectedShape { response, fallback } => write!(
                f,
                "Load failed: unexpected /api/sheets response: {response} (export fallback: {fallback})"
            ),
            FetchError::Unreachable { primary, fallback } => {
                write!(f, "Load failed: {primary} (export fallback: {fallback})")
            }
        }
    }
}
impl std::error::Error for FetchError {}

/// The rows of a proxy response, or a description of what came back instead.
pub fn response_rows(response: SheetResponse) -> Result<Vec<Row>, String> {
    match response {
        SheetResponse::Rows(rows) => Ok(rows),
        SheetResponse::Error { error, message } => Err(match message {
            Some(message) => format!("{error}: {message}"),
            None => error,
        }),
        SheetResponse::Unexpected(body) => Err(body),
    }
}

/// The rows of a public export read, or why it cannot stand in for the proxy.
/// An empty table counts as a failure.
pub fn export_rows(sheet: &str, export: ClientResult<ExportTable>) -> ClientResult<Vec<Row>> {
    match export {
        Ok(table) if !table.rows.is_empty() => Ok(table.into_rows()),
        Ok(_) => Err(ClientError::ExportFormatError(format!("sheet {sheet} is empty"))),
        Err(e) => Err(e),
    }
}

/// Fetch a row collection.
///
/// Reads `/api/sheets` first. If it answers with anything that is not a table,
/// the same sheet is read from the spreadsheet's public export instead.
/// Transport failures against the proxy are reported as-is and not retried.
pub async fn fetch_rows<A: SheetApi>(api: &A, request: &SheetRequest) -> Result<Vec<Row>, FetchError> {
    let response = api.sheet(request).await.map_err(FetchError::Unavailable)?;
    let response = match response_rows(response) {
        Ok(rows) => return Ok(rows),
        Err(response) => response,
    };

    let sheet = request.sheet.as_deref().unwrap_or(DEFAULT_SHEET);
    let range = request.range.as_deref().unwrap_or(DEFAULT_RANGE);
    tracing::warn!("/api/sheets returned no rows for {sheet} ({response}), trying the public export");

    export_rows(sheet, api.export(sheet, range).await)
        .map_err(|fallback| FetchError::UnexpectedShape { response, fallback })
}

/// Fetch the named table, trying the public export whenever the proxy does not
/// deliver rows, including when it cannot be reached at all.
pub async fn fetch_table<A: SheetApi>(api: &A, sheet: &str) -> Result<Vec<Row>, FetchError> {
    match fetch_rows(api, &SheetRequest::named(sheet)).await {
        Err(FetchError::Unavailable(primary)) => {
            tracing::debug!("/api/sheets unavailable for {sheet} ({primary}), trying the public export");
            export_rows(sheet, api.export(sheet, DEFAULT_RANGE).await)
                .map_err(|fallback| FetchError::Unreachable { primary, fallback })
        }
        result => result,
    }
}

/// Build the option lists for `locale`.
///
/// The translations are best-effort: if they cannot be fetched, every list
/// degrades to its fallback.
pub async fn fetch_option_lists(client: &Client, locale: &str, rows: &[Row]) -> OptionLists {
    let translations = client
        .translations()
        .await
        .inspect_err(|e| tracing::warn!("failed to fetch translations, using fallbacks: {e}"))
        .ok();
    OptionLists::build(translations.as_ref(), locale, rows)
}
