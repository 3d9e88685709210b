//! Inventory domain module.
//!
//! This crate contains the in-memory item store and everything derived from it
//! (view pipeline, selection, valuation, CSV export, billing), implemented purely as
//! deterministic domain logic (no IO, no rendering).

pub mod billing;
pub mod config;
pub mod export;
pub mod item;
pub mod selection;
pub mod session;
pub mod store;
pub mod valuation;
pub mod view;

pub use billing::{Bill, BillHistory, BillLine};
pub use config::{CategoryPolicy, ConfigError, InventoryConfig};
pub use export::{CSV_HEADER, DEFAULT_EXPORT_FILE_NAME, export_csv};
pub use item::{Item, ItemDraft};
pub use selection::SelectionSet;
pub use session::InventorySession;
pub use store::{
    AddItem, CategoryChanged, EditItem, InventoryCommand, InventoryEvent, ItemAdded, ItemEdited,
    ItemRemoved, ItemStore, RemoveItems, SetCategory,
};
pub use valuation::InventorySummary;
pub use view::{ItemFilter, Page, SortDirection, SortField, SortOrder, ViewCriteria};
