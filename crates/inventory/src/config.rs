//! Session configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::DEFAULT_EXPORT_FILE_NAME;
use crate::item::Item;
use crate::view::DEFAULT_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("page_size must be at least 1")]
    InvalidPageSize,

    #[error("categories cannot contain blank entries")]
    BlankCategory,

    #[error("strict_categories requires at least one category")]
    NoCategories,

    #[error("export_file_name cannot be empty")]
    EmptyExportFileName,
}

/// Settings for one inventory session.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryConfig {
    /// Rows per page in the view.
    pub page_size: usize,
    /// Category labels offered to the user.
    pub categories: Vec<String>,
    /// Reject categories outside `categories` on add/edit/bulk change.
    pub strict_categories: bool,
    /// Suggested file name for CSV exports.
    pub export_file_name: String,
    /// Items loaded into the store at startup.
    pub seed: Vec<Item>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            categories: ["Electronics", "Fruits", "Vegetables", "Clothing", "Furniture"]
                .into_iter()
                .map(String::from)
                .collect(),
            strict_categories: false,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            seed: Vec::new(),
        }
    }
}

impl InventoryConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::BlankCategory);
        }
        if self.strict_categories && self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyExportFileName);
        }
        Ok(())
    }

    pub fn category_policy(&self) -> CategoryPolicy {
        CategoryPolicy {
            known: self.categories.clone(),
            strict: self.strict_categories,
        }
    }
}

/// Which categories the store accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryPolicy {
    known: Vec<String>,
    strict: bool,
}

impl CategoryPolicy {
    /// Accept any non-empty category.
    pub fn open(known: Vec<String>) -> Self {
        Self {
            known,
            strict: false,
        }
    }

    /// Accept only the listed categories.
    pub fn strict(known: Vec<String>) -> Self {
        Self {
            known,
            strict: true,
        }
    }

    pub fn known(&self) -> &[String] {
        &self.known
    }

    pub fn is_known(&self, category: &str) -> bool {
        self.known.iter().any(|k| k == category)
    }

    pub fn allows(&self, category: &str) -> bool {
        !self.strict || self.is_known(category)
    }
}
