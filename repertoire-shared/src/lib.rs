pub mod config {
    use serde::{Deserialize, Serialize};

    /// Where the catalog is read from.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    pub struct Server {
        /// The base URL of the sheets proxy.
        pub base_url: String,
        /// The spreadsheet read through the public export when the proxy
        /// does not answer with rows.
        pub spreadsheet_id: String,
        pub sheet: String,
        pub range: String,
    }
    impl Default for Server {
        fn default() -> Self {
            Self {
                base_url: "http://localhost:4321".to_string(),
                spreadsheet_id: "YOUR_SPREADSHEET_ID".to_string(),
                sheet: "MusicList".to_string(),
                range: "A1:Z1000".to_string(),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_partial_server_table_keeps_defaults() {
            let server: Server = toml::from_str(r#"spreadsheet_id = "abc123""#).unwrap();
            assert_eq!(server.spreadsheet_id, "abc123");
            assert_eq!(server.sheet, "MusicList");
            assert_eq!(server.base_url, Server::default().base_url);
        }
    }
}
