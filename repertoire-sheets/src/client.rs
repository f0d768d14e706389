#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request.
    ReqwestError(reqwest::Error),
    /// An error that occurred when deserializing a response.
    DeserializationError(serde_json::Error),
    /// The proxy returned an error body.
    ApiError {
        /// The error summary.
        error: String,
        /// The detailed error message.
        message: Option<String>,
    },
    /// The public export returned something that is not a table.
    ExportFormatError(String),
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
            ClientError::ApiError { error, message } => {
                write!(f, "Sheets API error: {error}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            ClientError::ExportFormatError(e) => write!(f, "Export format error: {e}"),
        }
    }
}
impl std::error::Error for ClientError {}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// A client for the `/api/sheets` proxy and the spreadsheet's public export.
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) spreadsheet_id: String,
    pub(crate) client: reqwest::Client,
}
impl Client {
    /// The base URL of the public, read-only spreadsheet export.
    pub const EXPORT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

    /// Create a new client.
    ///
    /// `base_url` is the site serving `/api/sheets` and `/i18n/translations.json`;
    /// `spreadsheet_id` identifies the spreadsheet for the public export fallback.
    pub fn new(base_url: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The site this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
