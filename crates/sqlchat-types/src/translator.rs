//! Wire types of the external translation service.
//!
//! `POST /generate` turns a natural-language question into an explanation and
//! optionally a SQL statement; `GET /schema` describes the tables behind a
//! connection string.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings forwarded to `/generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSettings {
    pub query_timeout: u64,
    pub show_sql_queries: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub query: String,
    pub db_url: String,
    /// Upper-case dialect name, e.g. `POSTGRESQL`.
    pub dialect: String,
    pub settings: GenerateSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub explanation: String,
    #[serde(default)]
    pub sql_query: Option<String>,
}

/// Raw description of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Column name to referenced `table.column`.
    #[serde(default)]
    pub foreign_keys: BTreeMap<String, String>,
}

/// Table name to table description.
pub type RawSchema = BTreeMap<String, TableSchema>;

/// Response of `GET /schema`, relayed verbatim by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: RawSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_response_parses_service_shape() {
        let raw = serde_json::json!({
            "schema": {
                "orders": {
                    "columns": ["id", "customer_id", "total"],
                    "primary_key": ["id"],
                    "foreign_keys": { "customer_id": "customers.id" }
                },
                "customers": { "columns": ["id"], "primary_key": ["id"] }
            }
        });
        let parsed: SchemaResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.schema.len(), 2);
        assert_eq!(parsed.schema["orders"].foreign_keys["customer_id"], "customers.id");
        assert!(parsed.schema["customers"].foreign_keys.is_empty());
    }

    #[test]
    fn test_generate_response_without_sql() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"explanation":"No data."}"#).unwrap();
        assert_eq!(parsed.sql_query, None);
    }
}
