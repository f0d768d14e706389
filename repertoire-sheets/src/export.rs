use serde::Deserialize;

use crate::{Client, ClientError, ClientResult, Row, row::CellText};

/// A table read from the spreadsheet's public `gviz` export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    /// The column labels (or ids, when a column has no label).
    pub headers: Vec<String>,
    /// The cells of each row, as text.
    pub rows: Vec<Vec<String>>,
}
impl ExportTable {
    /// The wrapper the export puts around its JSON payload.
    const RESPONSE_PREFIX: &str = "google.visualization.Query.setResponse(";

    /// Parse the export's JavaScript-wrapped JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the wrapper is missing, the payload is not valid
    /// JSON, or the payload has no table.
    pub fn parse(text: &str) -> ClientResult<Self> {
        let start = text
            .find(Self::RESPONSE_PREFIX)
            .map(|i| i + Self::RESPONSE_PREFIX.len())
            .ok_or_else(|| ClientError::ExportFormatError("missing setResponse wrapper".into()))?;
        let payload = text[start..]
            .trim_end()
            .trim_end_matches(';')
            .trim_end()
            .strip_suffix(')')
            .ok_or_else(|| ClientError::ExportFormatError("unterminated setResponse".into()))?;

        #[derive(Deserialize)]
        struct Response {
            table: Option<Table>,
        }
        #[derive(Deserialize)]
        struct Table {
            #[serde(default)]
            cols: Vec<Option<Column>>,
            #[serde(default)]
            rows: Vec<TableRow>,
        }
        #[derive(Deserialize)]
        struct Column {
            id: Option<String>,
            label: Option<String>,
        }
        #[derive(Deserialize)]
        struct TableRow {
            #[serde(default)]
            c: Vec<Option<Cell>>,
        }
        #[derive(Deserialize)]
        struct Cell {
            #[serde(default)]
            v: Option<CellText>,
        }

        let table = serde_json::from_str::<Response>(payload)?
            .table
            .ok_or_else(|| ClientError::ExportFormatError("response has no table".into()))?;

        let headers = table
            .cols
            .into_iter()
            .map(|col| {
                col.and_then(|c| c.label.filter(|l| !l.is_empty()).or(c.id))
                    .unwrap_or_default()
            })
            .collect();
        let rows = table
            .rows
            .into_iter()
            .map(|row| {
                row.c
                    .into_iter()
                    .map(|cell| cell.and_then(|c| c.v).unwrap_or_default().0)
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }

    /// Convert to keyed rows. Blank headers become `col1`, `col2`, ... by
    /// column position, and short rows are padded with empty cells.
    pub fn into_rows(self) -> Vec<Row> {
        let headers: Vec<String> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.trim();
                if h.is_empty() {
                    format!("col{}", i + 1)
                } else {
                    h.to_string()
                }
            })
            .collect();

        self.rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(headers.len(), String::new());
                Row::Keyed(headers.iter().cloned().zip(cells).collect())
            })
            .collect()
    }
}

/// Public export functionality.
impl Client {
    /// Read a sheet from the spreadsheet's public, read-only export.
    pub async fn export(&self, sheet: &str, range: &str) -> ClientResult<ExportTable> {
        let url = format!("{}/{}/gviz/tq", Client::EXPORT_BASE_URL, self.spreadsheet_id);
        let text = self
            .request_text(
                &url,
                &[
                    ("tqx", "out:json".to_string()),
                    ("sheet", sheet.to_string()),
                    ("range", range.to_string()),
                ],
            )
            .await?;
        ExportTable::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","status":"ok","table":{"cols":[{"id":"A","label":"Composer","type":"string"},{"id":"B","label":"","type":"string"},{"id":"C","label":"Year","type":"number"}],"rows":[{"c":[{"v":"Abramyan, Eduard"},null,{"v":1957.0,"f":"1957"}]},{"c":[{"v":"Glière, Reinhold"},{"v":"Kyiv"}]}]}});"#;

    #[test]
    fn test_parse_export() {
        let table = ExportTable::parse(SAMPLE).unwrap();
        assert_eq!(table.headers, ["Composer", "B", "Year"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["Abramyan, Eduard".to_string(), String::new(), "1957".to_string()],
                vec!["Glière, Reinhold".to_string(), "Kyiv".to_string()],
            ]
        );
    }

    #[test]
    fn test_export_rows_pad_and_name_blank_headers() {
        let table = ExportTable {
            headers: vec!["Composer".into(), " ".into()],
            rows: vec![vec!["Glière, Reinhold".into()]],
        };
        assert_eq!(
            table.into_rows(),
            vec![Row::keyed([("Composer", "Glière, Reinhold"), ("col2", "")])]
        );
    }

    #[test]
    fn test_parse_rejects_unwrapped_text() {
        assert!(matches!(
            ExportTable::parse("<html></html>"),
            Err(ClientError::ExportFormatError(_))
        ));
        assert!(matches!(
            ExportTable::parse("google.visualization.Query.setResponse({\"status\":\"error\"});"),
            Err(ClientError::ExportFormatError(_))
        ));
    }
}
