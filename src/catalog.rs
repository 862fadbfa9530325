use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::labels::DEFAULT_CATEGORY;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Protocol {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "lenient_page")]
    pub start_page: i64,
    #[serde(deserialize_with = "lenient_page")]
    pub end_page: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page numbers written as floats or numeric strings are accepted; anything
/// else becomes 0 rather than dropping the record.
fn lenient_page<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(page_number(&value).unwrap_or(0))
}

fn page_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Protocol {
    /// Grouping label; blank categories land in the general bucket.
    pub fn category_label(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }

    /// `"12"` for single-page entries, `"12-14"` otherwise.
    pub fn page_range(&self) -> String {
        if self.end_page == self.start_page {
            self.start_page.to_string()
        } else {
            format!("{}-{}", self.start_page, self.end_page)
        }
    }

    fn is_usable(&self) -> bool {
        !self.id.is_empty() && !self.title.is_empty()
    }
}

#[derive(Deserialize, Default)]
struct CatalogDocument {
    #[serde(default)]
    protocols: Value,
}

/// The protocol set, loaded once and never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    protocols: Vec<Protocol>,
}

impl Catalog {
    #[cfg(test)]
    pub fn new(protocols: Vec<Protocol>) -> Self {
        Self { protocols }
    }

    /// Decodes `{ "protocols": [...] }`.
    ///
    /// Only a document that is not JSON at all is an error. A missing or
    /// non-array `protocols` yields an empty catalog, and individual entries
    /// that fail to decode or lack an id or title are dropped.
    pub fn from_json(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        let doc: CatalogDocument = serde_json::from_value(root).unwrap_or_default();

        let Value::Array(entries) = doc.protocols else {
            debug!("catalog has no protocols array");
            return Ok(Self::default());
        };

        let total = entries.len();
        let protocols: Vec<Protocol> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<Protocol>(entry).ok())
            .filter(Protocol::is_usable)
            .collect();

        if protocols.len() != total {
            debug!(
                kept = protocols.len(),
                dropped = total - protocols.len(),
                "dropped malformed catalog entries"
            );
        }
        Ok(Self { protocols })
    }

    pub fn all(&self) -> &[Protocol] {
        &self.protocols
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    /// First record with a matching id; later duplicates are shadowed.
    pub fn find(&self, id: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
pub(crate) fn protocol(id: &str, category: &str, title: &str, start: i64, end: i64) -> Protocol {
    Protocol {
        id: id.to_string(),
        category: category.to_string(),
        title: title.to_string(),
        start_page: start,
        end_page: end,
        content: format!("{title} body"),
    }
}
