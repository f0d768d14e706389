use serde::Deserialize;

use crate::{Client, ClientError, ClientResult, Row};

/// A request to the `/api/sheets` endpoint.
#[derive(Debug, Clone, Default)]
pub struct SheetRequest {
    /// The sheet (tab) to read. The proxy's default sheet is used when unset.
    pub sheet: Option<String>,
    /// An A1-style range, such as `A1:Z1000`.
    pub range: Option<String>,
}
impl SheetRequest {
    /// A request for a named sheet.
    pub fn named(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
            range: None,
        }
    }
}

/// What the `/api/sheets` endpoint answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetResponse {
    /// A table of rows, either bare or wrapped in `{ "rows": [...] }`.
    Rows(Vec<Row>),
    /// The proxy's `{ "error", "message" }` body.
    Error {
        /// The error summary.
        error: String,
        /// The detailed message, if any.
        message: Option<String>,
    },
    /// Anything else, kept as text for diagnostics.
    Unexpected(String),
}
impl SheetResponse {
    /// Classify a raw response body.
    pub fn parse(bytes: &[u8]) -> Self {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Body {
            Rows(Vec<Row>),
            Wrapped {
                rows: Vec<Row>,
            },
            Error {
                error: String,
                #[serde(default)]
                message: Option<String>,
            },
        }

        match serde_json::from_slice::<Body>(bytes) {
            Ok(Body::Rows(rows)) | Ok(Body::Wrapped { rows }) => SheetResponse::Rows(rows),
            Ok(Body::Error { error, message }) => SheetResponse::Error { error, message },
            Err(_) => SheetResponse::Unexpected(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The rows, or an error describing why there are none.
    pub fn into_rows(self) -> ClientResult<Vec<Row>> {
        match self {
            SheetResponse::Rows(rows) => Ok(rows),
            SheetResponse::Error { error, message } => Err(ClientError::ApiError { error, message }),
            SheetResponse::Unexpected(body) => Err(ClientError::ApiError {
                error: "unexpected response".to_string(),
                message: Some(body),
            }),
        }
    }
}

/// Sheet-related functionality.
impl Client {
    /// Read a sheet through the `/api/sheets` proxy.
    ///
    /// Only transport failures are errors; a body that is not a table is
    /// returned as [`SheetResponse::Error`] or [`SheetResponse::Unexpected`]
    /// so the caller can decide whether to fall back to the public export.
    pub async fn sheet(&self, request: &SheetRequest) -> ClientResult<SheetResponse> {
        let mut parameters = vec![];
        if let Some(sheet) = &request.sheet {
            parameters.push(("sheet", sheet.clone()));
        }
        if let Some(range) = &request.range {
            parameters.push(("range", range.clone()));
        }

        let bytes = self.request_raw("api/sheets", &parameters).await?;
        Ok(SheetResponse::parse(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let response = SheetResponse::parse(br#"[{"Composer": "Shostakovich, Dmitri"}]"#);
        assert_eq!(
            response,
            SheetResponse::Rows(vec![Row::keyed([("Composer", "Shostakovich, Dmitri")])])
        );
    }

    #[test]
    fn test_parse_wrapped_rows() {
        let response = SheetResponse::parse(br#"{"rows": [["a", "b"]]}"#);
        assert_eq!(response, SheetResponse::Rows(vec![Row::positional(["a", "b"])]));
    }

    #[test]
    fn test_parse_error_body() {
        let response = SheetResponse::parse(
            br#"{"error": "Missing credentials", "message": "Place a service account JSON"}"#,
        );
        assert_eq!(
            response,
            SheetResponse::Error {
                error: "Missing credentials".to_string(),
                message: Some("Place a service account JSON".to_string()),
            }
        );
        assert!(matches!(
            response.into_rows(),
            Err(ClientError::ApiError { .. })
        ));
    }

    #[test]
    fn test_parse_garbage_is_unexpected() {
        assert_eq!(
            SheetResponse::parse(b"<html>502</html>"),
            SheetResponse::Unexpected("<html>502</html>".to_string())
        );
        assert!(matches!(
            SheetResponse::parse(br#"{"status": 502}"#),
            SheetResponse::Unexpected(_)
        ));
    }
}
