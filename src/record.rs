//! Bibliographic record model
//!
//! A record is an ordered collection of string fields, mirroring a single
//! BibTeX entry. Field order is preserved as inserted so the detail pane can
//! show fields the way the library file lists them.

/// Entry key field name.
pub const KEY_FIELD: &str = "ID";

/// Synthetic marker field set by the store when a PDF is linked.
pub const PDF_FIELD: &str = "pdf";

/// Marker value meaning "attachment present".
pub const PDF_PRESENT: &str = "pdf";

/// Marker value meaning "no attachment", width-matched to [`PDF_PRESENT`]
/// so list rows line up.
pub const PDF_ABSENT: &str = "   ";

/// A single bibliographic entry: an entry type plus ordered string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    entry_type: String,
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record of the given BibTeX entry type.
    #[must_use]
    pub fn new(entry_type: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            fields: Vec::new(),
        }
    }

    /// The BibTeX entry type ("article", "book", ...).
    #[must_use]
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, replacing an existing value or appending a new field
    /// at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Iterate over fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The entry key, empty if the store has not assigned one yet.
    #[must_use]
    pub fn key(&self) -> &str {
        self.get(KEY_FIELD).unwrap_or("")
    }

    /// Whether the store found a linked PDF for this entry.
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.get(PDF_FIELD) == Some(PDF_PRESENT)
    }

    /// The comma-separated `tags` field split into individual tags.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.get("tags")
            .map(|t| t.split(',').map(str::trim).collect())
            .unwrap_or_default()
    }
}
