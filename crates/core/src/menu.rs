//! Menu catalog and category filtering.
//!
//! The catalog is loaded once per session and never mutated afterwards. All
//! category data is derived from the items themselves.

use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{MenuItemId, Price};

/// A dish on the menu, as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub category: String,
    /// Image URL, if the dish has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The category selection applied to the menu.
///
/// Serialized as the category name, with the sentinel `"All"` meaning no
/// filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Sentinel label that selects every item.
    pub const ALL_LABEL: &'static str = "All";

    /// Parse a selection label; `"All"` maps to [`CategoryFilter::All`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == Self::ALL_LABEL {
            Self::All
        } else {
            Self::Category(label.to_owned())
        }
    }

    /// The label shown for this selection.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Category(name) => name,
        }
    }

    /// Whether `item` passes this filter.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => item.category == *name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// The loaded menu catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Wrap a catalog as returned by the backend, preserving its order.
    #[must_use]
    pub const fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// All items in catalog order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn distinct_categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// `All` followed by every distinct category, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(
                self.distinct_categories()
                    .into_iter()
                    .map(|category| CategoryFilter::Category(category.to_owned())),
            )
            .collect()
    }

    /// Whether `filter` names `All` or a category present in the catalog.
    #[must_use]
    pub fn offers(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => self.items.iter().any(|item| item.category == *name),
        }
    }

    /// Items passing `filter`, in catalog order.
    #[must_use]
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }
}

impl From<Vec<MenuItem>> for Menu {
    fn from(items: Vec<MenuItem>) -> Self {
        Self::new(items)
    }
}
