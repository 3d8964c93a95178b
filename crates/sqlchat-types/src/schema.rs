//! Table-of-columns view shown in the dashboard schema tab.

use serde::{Deserialize, Serialize};

/// Data type shown for every column; the schema service does not report types.
pub const PLACEHOLDER_COLUMN_TYPE: &str = "VARCHAR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub name: String,
    pub data_type: String,
    /// e.g. `PRIMARY KEY`, `FOREIGN KEY (customers.id)`
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub name: String,
    pub columns: Vec<ColumnView>,
}
