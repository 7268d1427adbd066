#[cfg(test)]
mod tests {
    use super::super::file_store::MemoryStorage;
    use super::super::task_storage::{STORAGE_KEY, TaskStorage};
    use crate::domain::storage::{KeyValueStorage, StorageError};
    use crate::domain::task::{Task, TaskId, TaskStatus};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    #[derive(Clone, Default)]
    struct FailingStorage;

    #[async_trait]
    impl KeyValueStorage for FailingStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("backend offline".into()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("backend offline".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("backend offline".into()))
        }
    }

    fn sample_task(id: &str) -> Task {
        Task {
            id: TaskId(id.to_owned()),
            title: "Buy milk".into(),
            description: Some("two liters".into()),
            status: TaskStatus::Completed,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
            updated_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()),
            completed_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()),
        }
    }

    fn minimal_task(id: &str) -> Task {
        Task {
            id: TaskId(id.to_owned()),
            title: "untouched".into(),
            description: None,
            status: TaskStatus::Active,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
            updated_at: None,
            completed_at: None,
        }
    }

    fn storage() -> (TaskStorage<MemoryStorage>, MemoryStorage) {
        let backend = MemoryStorage::new();
        (TaskStorage::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn missing_record_loads_empty() {
        let (storage, _backend) = storage();
        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn round_trip_preserves_tasks_and_optional_fields() {
        let (storage, _backend) = storage();
        let tasks = vec![sample_task("a"), minimal_task("b")];

        storage.save(&tasks).await;
        let loaded = storage.load().await;

        assert_eq!(loaded, tasks);
    }

    #[tokio::test]
    async fn save_normalizes_optional_fields_on_the_wire() {
        let (storage, backend) = storage();
        storage.save(&[minimal_task("b")]).await;

        let raw = backend.get(STORAGE_KEY).await.unwrap().unwrap();
        let records: Value = serde_json::from_str(&raw).unwrap();
        let record = &records[0];

        assert!(record.get("description").is_none());
        assert!(record.get("updatedAt").is_none());
        // completedAt is always present, null while active
        assert_eq!(record.get("completedAt"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn malformed_elements_are_dropped_individually() {
        let (storage, backend) = storage();
        let payload = json!([
            {
                "id": "good",
                "title": "kept",
                "status": "active",
                "createdAt": "2026-01-01T08:00:00Z"
            },
            { "title": "no id", "status": "active", "createdAt": "2026-01-01T08:00:00Z" },
            { "id": "bad-status", "title": "x", "status": "archived", "createdAt": "2026-01-01T08:00:00Z" },
            { "id": "bad-title", "title": 7, "status": "active", "createdAt": "2026-01-01T08:00:00Z" },
            { "id": "bad-date", "title": "x", "status": "active", "createdAt": "yesterday" },
            "not an object"
        ]);
        backend
            .set(STORAGE_KEY, payload.to_string())
            .await
            .unwrap();

        let loaded = storage.load().await;

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "good");
    }

    #[tokio::test]
    async fn salvageable_fields_degrade_without_dropping_the_element() {
        let (storage, backend) = storage();
        let payload = json!([{
            "id": "worn",
            "title": "kept",
            "status": "active",
            "createdAt": "2026-01-01T08:00:00Z",
            "description": "",
            "updatedAt": 12,
            "completedAt": 42
        }]);
        backend
            .set(STORAGE_KEY, payload.to_string())
            .await
            .unwrap();

        let loaded = storage.load().await;

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, None);
        assert_eq!(loaded[0].updated_at, None);
        assert_eq!(loaded[0].completed_at, None);
    }

    #[tokio::test]
    async fn stored_completion_fields_are_kept_verbatim() {
        let (storage, backend) = storage();
        let payload = json!([{
            "id": "legacy",
            "title": "kept",
            "status": "completed",
            "createdAt": "2026-01-01T08:00:00Z",
            "completedAt": "2026-01-02T08:00:00Z"
        }]);
        backend
            .set(STORAGE_KEY, payload.to_string())
            .await
            .unwrap();

        let loaded = storage.load().await;

        assert_eq!(loaded[0].status, TaskStatus::Completed);
        assert_eq!(
            loaded[0].completed_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn corrupt_json_loads_empty() {
        let (storage, backend) = storage();
        backend
            .set(STORAGE_KEY, "{not valid json".to_owned())
            .await
            .unwrap();

        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn non_array_record_loads_empty() {
        let (storage, backend) = storage();
        backend
            .set(STORAGE_KEY, json!({ "tasks": [] }).to_string())
            .await
            .unwrap();

        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_the_record() {
        let (storage, backend) = storage();
        storage.save(&[sample_task("a")]).await;

        storage.clear().await;

        assert_eq!(backend.get(STORAGE_KEY).await.unwrap(), None);
        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn backend_failures_are_swallowed() {
        let storage = TaskStorage::new(FailingStorage);

        assert!(storage.load().await.is_empty());
        storage.save(&[sample_task("a")]).await;
        storage.clear().await;
    }
}
