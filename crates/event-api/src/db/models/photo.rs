//! Photo gallery model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A gallery photo. `id` is the primary key; `is_accepted` is the
/// moderation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_accepted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_photo_from_client_json() {
        let photo: Photo = serde_json::from_value(json!({
            "id": "p1",
            "title": "First dance",
            "date": "2026-06-20T19:30:00Z",
            "imageUrl": "https://cdn.example.com/p1.jpg"
        }))
        .unwrap();

        assert_eq!(photo.id, "p1");
        assert!(!photo.is_accepted);
        assert_eq!(
            photo.date.map(|d| d.to_rfc3339()).as_deref(),
            Some("2026-06-20T19:30:00+00:00")
        );
    }

    #[test]
    fn test_photo_rejects_bad_date() {
        let result = serde_json::from_value::<Photo>(json!({
            "id": "p1",
            "title": "t",
            "date": "last tuesday",
            "imageUrl": "u"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_photo_null_columns() {
        let photo: Photo = serde_json::from_value(json!({
            "id": "p9",
            "title": null,
            "date": null,
            "imageUrl": null,
            "isAccepted": null
        }))
        .unwrap();

        assert_eq!(photo.title, None);
        assert_eq!(photo.date, None);
        assert!(!photo.is_accepted);
    }
}
