use serde::{Deserialize, Serialize};

/// Paging and ordering options shared across list queries.
/// Values are passed through to the remote service as given; the remote
/// contract owns defaults and limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
    /// Comma-separated relation names to expand on every listed record.
    pub relations: Option<String>,
}

impl ListOptions {
    pub fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        push_opt(pairs, "order", &self.order);
        push_opt(pairs, "relations", &self.relations);
    }
}

/// Appends `key=value` when the value is present and non-empty.
pub fn push_opt(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        pairs.push((key, v.to_string()));
    }
}

/// Turns a query descriptor into URL query pairs for the remote service.
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Option projection used by select inputs (`value` + display label).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}
