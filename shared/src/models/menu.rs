//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group name for items the catalog did not tag with a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Menu item entity (read-only on the client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Unit price in currency unit
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MenuItem {
    pub fn new(id: i64, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Category used for grouping, falling back to [`UNCATEGORIZED`]
    pub fn category_or_default(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNCATEGORIZED)
    }
}

/// Group catalog items by category tag.
///
/// Groups are ordered by name; items keep their catalog order within a group.
pub fn group_by_category(items: &[MenuItem]) -> BTreeMap<String, Vec<MenuItem>> {
    let mut groups: BTreeMap<String, Vec<MenuItem>> = BTreeMap::new();
    for item in items {
        groups
            .entry(item.category_or_default().to_string())
            .or_default()
            .push(item.clone());
    }
    groups
}
