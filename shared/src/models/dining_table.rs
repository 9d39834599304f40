//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table identity resolved from a scanned code
///
/// Persisted locally so the header can keep showing the table badge
/// across pages without re-resolving the code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub location: Option<TableLocation>,
}

/// Table location, which the backend sends either as a bare string or
/// as an object carrying a `name` field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TableLocation {
    Name(String),
    Detail { name: Option<String> },
}

impl TableLocation {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(s) => Some(s.as_str()),
            Self::Detail { name } => name.as_deref(),
        }
    }
}

impl DiningTable {
    /// Header badge text, e.g. "Lantai 2 Meja 7"
    pub fn display_label(&self) -> String {
        match self.location.as_ref().and_then(TableLocation::name) {
            Some(loc) => format!("{} {}", loc, self.name),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_as_string_or_object() {
        let a: DiningTable =
            serde_json::from_str(r#"{"id":1,"name":"Meja 7","location":"Lantai 2"}"#)
                .expect("string location");
        assert_eq!(a.display_label(), "Lantai 2 Meja 7");

        let b: DiningTable =
            serde_json::from_str(r#"{"id":1,"name":"Meja 7","location":{"name":"Teras"}}"#)
                .expect("object location");
        assert_eq!(b.display_label(), "Teras Meja 7");

        let c: DiningTable = serde_json::from_str(r#"{"id":2,"name":"Meja 9"}"#).expect("no location");
        assert_eq!(c.display_label(), "Meja 9");
    }
}
