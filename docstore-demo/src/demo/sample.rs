//! Sample data for the demonstration.

use chrono::{DateTime, Utc};
use docstore_repository::IndexConfig;
use docstore_shared::{Document, Geohash};

use crate::DemoError;

/// Longitude of the sample item's location.
pub const SAMPLE_LONGITUDE: f64 = 126.88;

/// Latitude of the sample item's location.
pub const SAMPLE_LATITUDE: f64 = 36.60;

/// Fields the search step matches against.
pub const SEARCH_FIELDS: [&str; 2] = ["title", "description"];

/// Mapping for the demo index. `location` must be a `geo_point` or the store
/// keeps the geohash as plain text.
pub fn index_config() -> IndexConfig {
    IndexConfig::default()
        .with_field("title", "text")
        .with_field("description", "text")
        .with_field("category", "keyword")
        .with_field("level", "integer")
        .with_field("registered", "date")
        .with_field("location", "geo_point")
}

/// The second-hand listing indexed by the demonstration.
pub fn sample_item(
    index_name: &str,
    id: &str,
    registered: DateTime<Utc>,
) -> Result<Document, DemoError> {
    let location = Geohash::from_lon_lat(SAMPLE_LONGITUDE, SAMPLE_LATITUDE)?;

    Ok(Document::new(index_name, id)
        .with_field("title", "아이폰 6S Plus")
        .with_field("description", "거의 새것이나 다름 없어요.")
        .with_field("category", "여성의류")
        .with_field("level", 3)
        .with_field("registered", registered)
        .with_field("location", location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use docstore_shared::FieldValue;

    #[test]
    fn test_sample_item_fields() {
        let registered = Utc.with_ymd_and_hms(2020, 12, 3, 9, 30, 0).unwrap();
        let doc = sample_item("demoitem", "v5KO4XMB_i31VgtFC0s1", registered).unwrap();

        assert_eq!(doc.index_name, "demoitem");
        assert_eq!(doc.id, "v5KO4XMB_i31VgtFC0s1");
        assert_eq!(doc.fields.len(), 6);
        assert_eq!(doc.fields["level"].as_i64(), Some(3));
        assert_eq!(doc.fields["registered"], FieldValue::Timestamp(registered));
        assert_eq!(
            doc.fields["location"].as_geohash().unwrap().as_str(),
            "wyd0pnz4qq90"
        );

        let source = doc.source();
        assert_eq!(source["location"], "wyd0pnz4qq90");
        assert_eq!(source["registered"], "2020-12-03T09:30:00.000Z");
    }

    #[test]
    fn test_index_config_maps_every_sample_field() {
        let registered = Utc.with_ymd_and_hms(2020, 12, 3, 9, 30, 0).unwrap();
        let doc = sample_item("demoitem", "X", registered).unwrap();
        let config = index_config();

        for name in doc.fields.keys() {
            assert!(config.properties.contains_key(name), "{} is not mapped", name);
        }
        assert_eq!(config.properties["location"]["type"], "geo_point");
    }
}
