use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// A stored row: a flat JSON object with an `id` key
pub type Record = Map<String, Value>;

const PROTECTED_KEYS: [&str; 2] = ["id", "created_at"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No record {key} in {table}")]
    NotFound { table: String, key: String },

    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// Equality filter for [`RecordStore::select`]
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

/// Managed database seen through create/read/update by key
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record, assigning `id` and timestamps. Returns the stored row.
    async fn insert(&self, table: &str, record: Record) -> Result<Record, StoreError>;

    /// Apply every key of `patch` to one record in a single write
    async fn update(&self, table: &str, key: &str, patch: Record) -> Result<Record, StoreError>;

    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, StoreError>;

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, one concurrent map per table
#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: DashMap<String, DashMap<String, Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, table: &str, mut record: Record) -> Result<Record, StoreError> {
        let id = match record.get("id") {
            None => Uuid::new_v4().to_string(),
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(other) => return Err(StoreError::Invalid(format!("id must be a string, got {}", other))),
        };
        let now = Value::String(Utc::now().to_rfc3339());
        record.insert("id".to_string(), Value::String(id.clone()));
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);

        let rows = self.tables.entry(table.to_string()).or_default();
        if rows.contains_key(&id) {
            return Err(StoreError::Invalid(format!("duplicate id {} in {}", id, table)));
        }
        rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, key: &str, patch: Record) -> Result<Record, StoreError> {
        let not_found = || StoreError::NotFound {
            table: table.to_string(),
            key: key.to_string(),
        };
        let rows = self.tables.get(table).ok_or_else(not_found)?;
        let mut row = rows.get_mut(key).ok_or_else(not_found)?;

        // The entry lock is held for the whole patch
        for (field, value) in patch {
            if !PROTECTED_KEYS.contains(&field.as_str()) {
                row.insert(field, value);
            }
        }
        row.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Ok(row.clone())
    }

    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.matches(row.value()))
                    .map(|row| row.value().clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        self.tables
            .get(table)
            .and_then(|rows| rows.remove(key))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                key: key.to_string(),
            })
    }
}

/// Id of a stored record
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = InMemoryRecordStore::new();
        let row = store
            .insert("profiles", object(json!({"user_id": "u1"})))
            .await
            .unwrap();
        assert!(record_id(&row).is_some());
        assert!(row.contains_key("created_at"));
        assert_eq!(store.len("profiles"), 1);
    }

    #[tokio::test]
    async fn update_applies_whole_patch_and_keeps_identity() {
        let store = InMemoryRecordStore::new();
        let row = store
            .insert("profiles", object(json!({"full_name": "a"})))
            .await
            .unwrap();
        let id = record_id(&row).unwrap().to_string();

        let updated = store
            .update(
                "profiles",
                &id,
                object(json!({
                    "id": "hijack",
                    "full_name": "Ram",
                    "full_name_original": "राम",
                    "full_name_language": "hi"
                })),
            )
            .await
            .unwrap();

        assert_eq!(record_id(&updated), Some(id.as_str()));
        assert_eq!(updated["full_name_original"], "राम");
        assert_eq!(updated["full_name_language"], "hi");
    }

    #[tokio::test]
    async fn update_of_missing_row_fails() {
        let store = InMemoryRecordStore::new();
        let err = store.update("profiles", "nope", Record::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn select_filters_by_equality() {
        let store = InMemoryRecordStore::new();
        store.insert("t", object(json!({"user_id": "a"}))).await.unwrap();
        store.insert("t", object(json!({"user_id": "b"}))).await.unwrap();
        let rows = store.select("t", &Filter::eq("user_id", "b")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(store.select("missing", &Filter::eq("x", 1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = InMemoryRecordStore::new();
        let row = store.insert("t", Record::new()).await.unwrap();
        let id = record_id(&row).unwrap().to_string();
        store.delete("t", &id).await.unwrap();
        assert!(store.is_empty("t"));
        assert!(store.delete("t", &id).await.is_err());
    }
}
