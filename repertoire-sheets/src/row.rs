use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{IgnoredAny, MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap as _, SerializeSeq as _},
};

/// A single record from a sheet.
///
/// Rows arrive either as arrays of cells (column A is index 0) or as objects
/// keyed by the sheet's header text. Keyed rows keep the source key order,
/// including duplicate keys, because positional lookups depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Cells in column order.
    Positional(Vec<String>),
    /// `(header, cell)` pairs in source order.
    Keyed(Vec<(String, String)>),
}
impl Row {
    /// Build a keyed row from `(header, cell)` pairs.
    pub fn keyed<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Row::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a positional row from cells.
    pub fn positional<V: Into<String>>(cells: impl IntoIterator<Item = V>) -> Self {
        Row::Positional(cells.into_iter().map(Into::into).collect())
    }

    /// The cell values, in order.
    pub fn values(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Row::Positional(cells) => Box::new(cells.iter().map(String::as_str)),
            Row::Keyed(pairs) => Box::new(pairs.iter().map(|(_, v)| v.as_str())),
        }
    }

    /// The header keys, in order. Positional rows have none.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let pairs: &[(String, String)] = match self {
            Row::Positional(_) => &[],
            Row::Keyed(pairs) => pairs,
        };
        pairs.iter().map(|(k, _)| k.as_str())
    }

    /// The cell under exactly `key`, if this row is keyed and has it.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Row::Positional(_) => None,
            Row::Keyed(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// The number of cells.
    pub fn len(&self) -> usize {
        match self {
            Row::Positional(cells) => cells.len(),
            Row::Keyed(pairs) => pairs.len(),
        }
    }

    /// Whether the row has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Row::Positional(cells) => {
                let mut seq = serializer.serialize_seq(Some(cells.len()))?;
                for cell in cells {
                    seq.serialize_element(cell)?;
                }
                seq.end()
            }
            Row::Keyed(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;
        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an array of cells or an object keyed by header")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Row, A::Error> {
                let mut cells = Vec::with_capacity(seq.size_hint().unwrap_or_default());
                while let Some(CellText(cell)) = seq.next_element()? {
                    cells.push(cell);
                }
                Ok(Row::Positional(cells))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Row, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some((key, CellText(cell))) = map.next_entry::<String, CellText>()? {
                    pairs.push((key, cell));
                }
                Ok(Row::Keyed(pairs))
            }
        }
        deserializer.deserialize_any(RowVisitor)
    }
}

/// A cell coerced to text. Numbers print without a trailing `.0`; `null` and
/// nested values become the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CellText(pub String);

impl<'de> Deserialize<'de> for CellText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellVisitor;
        impl<'de> Visitor<'de> for CellVisitor {
            type Value = CellText;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a cell value")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<CellText, E> {
                Ok(CellText(v.to_string()))
            }
            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<CellText, E> {
                Ok(CellText(v))
            }
            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<CellText, E> {
                Ok(CellText(v.to_string()))
            }
            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<CellText, E> {
                Ok(CellText(v.to_string()))
            }
            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<CellText, E> {
                Ok(CellText(v.to_string()))
            }
            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<CellText, E> {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    Ok(CellText(format!("{}", v as i64)))
                } else {
                    Ok(CellText(v.to_string()))
                }
            }
            fn visit_unit<E: serde::de::Error>(self) -> Result<CellText, E> {
                Ok(CellText::default())
            }
            fn visit_none<E: serde::de::Error>(self) -> Result<CellText, E> {
                Ok(CellText::default())
            }
            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<CellText, D::Error> {
                CellText::deserialize(d)
            }
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<CellText, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(CellText::default())
            }
            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CellText, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(CellText::default())
            }
        }
        deserializer.deserialize_any(CellVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_keyed_row_keeps_order_and_coerces_cells() {
        let row: Row = serde_json::from_str(
            r#"{"Title": "Concert scherzo", "Composer": "Abramyan, Eduard", "Published": 1957, "Notes": null}"#,
        )
        .unwrap();
        assert_eq!(
            row,
            Row::keyed([
                ("Title", "Concert scherzo"),
                ("Composer", "Abramyan, Eduard"),
                ("Published", "1957"),
                ("Notes", ""),
            ])
        );
        assert_eq!(
            row.keys().collect::<Vec<_>>(),
            ["Title", "Composer", "Published", "Notes"]
        );
    }

    #[test]
    fn test_deserialize_positional_row() {
        let row: Row = serde_json::from_str(r#"["Concert scherzo", "Abramyan, Eduard", 1957.0, true]"#)
            .unwrap();
        assert_eq!(
            row,
            Row::positional(["Concert scherzo", "Abramyan, Eduard", "1957", "true"])
        );
        assert_eq!(row.keys().count(), 0);
        assert_eq!(row.get("Title"), None);
    }

    #[test]
    fn test_keyed_row_preserves_duplicate_keys() {
        let row: Row = serde_json::from_str(r#"{"Year": "1950", "Year": "1951"}"#).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Year"), Some("1950"));
        assert_eq!(row.values().collect::<Vec<_>>(), ["1950", "1951"]);
    }

    #[test]
    fn test_nested_cells_become_empty() {
        let row: Row = serde_json::from_str(r#"{"A": [1, 2], "B": {"x": 1}, "C": 2.5}"#).unwrap();
        assert_eq!(row.values().collect::<Vec<_>>(), ["", "", "2.5"]);
    }

    #[test]
    fn test_serialize_keeps_shape() {
        let row = Row::keyed([("Composer", "Glière, Reinhold"), ("Decade", "1930s")]);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"Composer":"Glière, Reinhold","Decade":"1930s"}"#
        );
        let row = Row::positional(["a", "b"]);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["a","b"]"#);
    }
}
