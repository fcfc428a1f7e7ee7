//! JSON import/export of the whole review store.
//! The file is a JSON array of review items with camelCase fields.

use crate::error::StorageError;
use crate::models::ReviewItem;
use crate::models::item_store::validate_id;
use log::info;
use std::fs;
use std::path::Path;

/// Writes `items` to `path` as pretty-printed JSON.
pub fn export_items_to_path(items: &[ReviewItem], path: &Path) -> Result<(), StorageError> {
    let json_string = serde_json::to_string_pretty(items)?;
    fs::write(path, json_string)?;
    info!("Exported {} review items to '{}'", items.len(), path.display());
    Ok(())
}

/// Reads review items from `path`, rejecting records that could not have
/// come from the scheduler (bad id, non-finite ease factor).
pub fn import_items(path: &Path) -> Result<Vec<ReviewItem>, StorageError> {
    let contents = fs::read_to_string(path)?;
    let items: Vec<ReviewItem> = serde_json::from_str(&contents)?;

    for item in &items {
        if validate_id(&item.id).is_err() {
            return Err(StorageError::CorruptRecord(format!(
                "invalid shortcut id {:?}",
                item.id
            )));
        }
        if !item.ease_factor.is_finite() || item.ease_factor <= 0.0 {
            return Err(StorageError::CorruptRecord(format!(
                "{} has ease factor {}",
                item.id, item.ease_factor
            )));
        }
    }

    info!("Imported {} review items from '{}'", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rating, SchedulingPolicy};
    use crate::models::sm2::calculate_next_review;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shortcut_review_{}_{}", std::process::id(), name))
    }

    fn create_test_items() -> Vec<ReviewItem> {
        let t0 = Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();
        let fresh = ReviewItem::new("vscode.save", 2.5, t0);
        let reviewed = calculate_next_review(
            &ReviewItem::new("vscode.palette", 2.5, t0),
            Rating::Easy,
            t0,
            &SchedulingPolicy::default(),
        );
        vec![fresh, reviewed]
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let items = create_test_items();
        let path = temp_path("roundtrip.json");

        export_items_to_path(&items, &path).unwrap();
        let imported = import_items(&path).unwrap();
        assert_eq!(imported, items);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"lastPerformance\": \"easy\""));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_accepts_missing_history() {
        let path = temp_path("no_history.json");
        fs::write(
            &path,
            r#"[{
  "id": "vscode.copy",
  "easeFactor": 2.2,
  "intervalDays": 3,
  "repetitionCount": 2,
  "dueAt": "2023-05-04T12:00:00Z",
  "lastReviewedAt": "2023-05-01T12:00:00Z",
  "lastPerformance": "good"
}]"#,
        )
        .unwrap();

        let items = import_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].last_performance, Some(Rating::Good));
        assert!(items[0].review_history.is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_rejects_bad_records() {
        let path = temp_path("bad_id.json");
        fs::write(
            &path,
            r#"[{"id": "", "easeFactor": 2.5, "intervalDays": 0, "repetitionCount": 0,
                 "dueAt": "2023-05-01T12:00:00Z", "lastReviewedAt": null, "lastPerformance": null}]"#,
        )
        .unwrap();
        assert!(matches!(
            import_items(&path),
            Err(StorageError::CorruptRecord(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_import_nonexistent_file() {
        assert!(matches!(
            import_items(Path::new("nonexistent_file_xyz123.json")),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_import_invalid_json() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_items(&path), Err(StorageError::Json(_))));

        let _ = fs::remove_file(&path);
    }
}
