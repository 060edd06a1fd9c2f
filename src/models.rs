//! Data model for the place detail screen.
//!
//! Defines the wire shapes returned by the place-data service, the unified
//! [`PlaceRecord`] both data sources resolve into, and the review
//! normalization that fills every missing field with a display default.

use crate::config::LocaleConfig;
use chrono::{DateTime, Local};
use serde::Deserialize;

/// A viewer or place position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Place attributes as rendered by the detail screen.
///
/// Produced from exactly one source per load: the remote service (carries a
/// coordinate, no industry) or the bundled dataset (carries an industry and a
/// pre-formatted distance, no coordinate). `distance == None` means unknown;
/// a computed `"0m"` is a valid value and is never collapsed into `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub rating: f64,
    pub address: String,
    pub industry: Option<String>,
    pub images: Vec<String>,
    pub coordinate: Option<Coordinate>,
    pub distance: Option<String>,
    pub bookmark: bool,
}

/// Response body of the place-data service, field names as on the wire.
///
/// Every field is optional so a sparse payload degrades instead of failing
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub url: String,
}

/// Review entry as returned by the place-data service.
///
/// `time` is kept as raw JSON: the service reports epoch seconds, but the
/// field has been observed missing and non-numeric, and a bad timestamp must
/// never take the whole payload down.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub time: Option<serde_json::Value>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Review in the uniform display shape. Every field is always populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Review {
    pub id: String,
    pub nick: String,
    pub rating: f64,
    pub review_text: String,
    pub created_at: String,
    pub images: Vec<String>,
}

impl From<&PlaceDetailsResponse> for PlaceRecord {
    fn from(resp: &PlaceDetailsResponse) -> Self {
        let coordinate = match (resp.lat, resp.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        };

        Self {
            name: resp.name.clone().unwrap_or_default(),
            rating: resp.rating.unwrap_or(0.0),
            address: resp.formatted_address.clone().unwrap_or_default(),
            industry: None,
            images: resp.photos.iter().map(|p| p.url.clone()).collect(),
            coordinate,
            distance: None,
            bookmark: false,
        }
    }
}

/// Maps raw service reviews into the display shape, in input order.
///
/// Total over any input: missing fields become the defaults from the locale
/// config (anonymous author, no-date stamp) or empty values.
pub fn normalize_reviews(raw: &[RawReview], locale: &LocaleConfig) -> Vec<Review> {
    raw.iter().map(|r| normalize_review(r, locale)).collect()
}

fn normalize_review(raw: &RawReview, locale: &LocaleConfig) -> Review {
    Review {
        id: raw.id.clone().unwrap_or_default(),
        nick: raw
            .author_name
            .clone()
            .unwrap_or_else(|| locale.anonymous_label.clone()),
        rating: raw.rating.unwrap_or(0.0),
        review_text: raw.text.clone().unwrap_or_default(),
        created_at: review_date(raw.time.as_ref(), locale),
        images: raw.photos.iter().map(|p| p.url.clone()).collect(),
    }
}

/// Renders an epoch-seconds value as a local date, or the no-date label when
/// the value is absent, not a number, or out of chrono's range.
fn review_date(time: Option<&serde_json::Value>, locale: &LocaleConfig) -> String {
    let epoch = time.and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));

    epoch
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| {
            dt.with_timezone(&Local)
                .format(&locale.date_format)
                .to_string()
        })
        .unwrap_or_else(|| locale.no_date_label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale() -> LocaleConfig {
        LocaleConfig::default()
    }

    #[test]
    fn empty_raw_review_gets_all_defaults() {
        let out = normalize_reviews(&[RawReview::default()], &locale());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "");
        assert_eq!(out[0].nick, locale().anonymous_label);
        assert_eq!(out[0].rating, 0.0);
        assert_eq!(out[0].review_text, "");
        assert_eq!(out[0].created_at, locale().no_date_label);
        assert!(out[0].images.is_empty());
    }

    #[test]
    fn well_formed_review_passes_through() {
        let raw: RawReview = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "authorName": "Kim",
            "rating": 4.5,
            "text": "great",
            "time": 1_700_000_000_i64,
            "photos": [{"url": "a.jpg"}]
        }))
        .unwrap();

        let out = normalize_reviews(&[raw], &locale());
        let expected_date = DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_timezone(&Local)
            .format(&locale().date_format)
            .to_string();

        assert_eq!(out[0].id, "r1");
        assert_eq!(out[0].nick, "Kim");
        assert_eq!(out[0].rating, 4.5);
        assert_eq!(out[0].review_text, "great");
        assert_eq!(out[0].created_at, expected_date);
        assert_eq!(out[0].images, vec!["a.jpg".to_string()]);
    }

    #[test]
    fn non_numeric_time_falls_back_to_no_date_label() {
        let raw: RawReview = serde_json::from_value(serde_json::json!({
            "id": "r2",
            "time": "yesterday"
        }))
        .unwrap();

        let out = normalize_reviews(&[raw], &locale());
        assert_eq!(out[0].created_at, locale().no_date_label);
    }

    #[test]
    fn out_of_range_time_falls_back_to_no_date_label() {
        let raw: RawReview = serde_json::from_value(serde_json::json!({
            "time": i64::MAX
        }))
        .unwrap();

        let out = normalize_reviews(&[raw], &locale());
        assert_eq!(out[0].created_at, locale().no_date_label);
    }

    #[test]
    fn output_order_matches_input_order() {
        let raws: Vec<RawReview> = serde_json::from_value(serde_json::json!([
            {"id": "a"}, {"id": "b"}, {"id": "c"}
        ]))
        .unwrap();

        let out = normalize_reviews(&raws, &locale());
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn remote_record_carries_coordinate_but_no_industry() {
        let resp: PlaceDetailsResponse = serde_json::from_value(serde_json::json!({
            "name": "Blue Bottle",
            "rating": 4.4,
            "formattedAddress": "1 Ferry Building, San Francisco",
            "lat": 37.7955,
            "lng": -122.3937,
            "photos": [{"url": "front.jpg"}, {"url": "bar.jpg"}]
        }))
        .unwrap();

        let record = PlaceRecord::from(&resp);
        assert_eq!(record.name, "Blue Bottle");
        assert_eq!(record.rating, 4.4);
        assert_eq!(record.address, "1 Ferry Building, San Francisco");
        assert_eq!(record.images, vec!["front.jpg", "bar.jpg"]);
        assert_eq!(record.coordinate, Some(Coordinate::new(37.7955, -122.3937)));
        assert_eq!(record.industry, None);
        assert_eq!(record.distance, None);
        assert!(!record.bookmark);
    }

    #[test]
    fn sparse_remote_payload_degrades_to_defaults() {
        let resp: PlaceDetailsResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let record = PlaceRecord::from(&resp);
        assert_eq!(record, PlaceRecord::default());
    }
}
