//! Remote-first place resolution.
//!
//! [`PlaceDetailFetcher`] resolves one place id into a [`PlaceRecord`] plus
//! the raw review list. The remote service is tried first; any failure there
//! drops to the bundled dataset, and an id unknown to both yields the
//! all-defaults record. Nothing escapes this boundary as an error.

use crate::api::PlaceProvider;
use crate::distance::{format_distance, haversine_meters};
use crate::fallback::{FallbackPlace, FallbackStore};
use crate::models::{Coordinate, PlaceDetailsResponse, PlaceRecord, RawReview};
use tracing::{info, warn};

/// Which source produced a fetch result.
///
/// A load uses exactly one source end-to-end; fields from different sources
/// are never mixed into one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Remote,
    Bundled,
    Missing,
}

/// Result of one fetch: the resolved record and the raw reviews that came
/// with it. Reviews are remote-only; the other origins always carry none.
#[derive(Debug)]
pub struct PlaceFetch {
    pub record: PlaceRecord,
    pub reviews: Vec<RawReview>,
    pub origin: FetchOrigin,
}

enum PlaceSource {
    Remote(PlaceDetailsResponse),
    Fallback(FallbackPlace),
    Missing,
}

pub struct PlaceDetailFetcher {
    provider: PlaceProvider,
    fallback: FallbackStore,
}

impl PlaceDetailFetcher {
    pub fn new(provider: PlaceProvider, fallback: FallbackStore) -> Self {
        Self { provider, fallback }
    }

    /// Resolves `id` into a record, attaching a formatted distance when both
    /// the viewer coordinate and the fetched place coordinate are known.
    ///
    /// Each call stands alone; the caller replaces its previous record and
    /// review list wholesale with the result.
    pub async fn fetch(&self, id: &str, viewer: Option<Coordinate>) -> PlaceFetch {
        match self.locate_source(id).await {
            PlaceSource::Remote(mut response) => {
                let reviews = std::mem::take(&mut response.reviews);
                let mut record = PlaceRecord::from(&response);

                if let (Some(v), Some(p)) = (viewer, record.coordinate) {
                    let meters = haversine_meters(v.lat, v.lng, p.lat, p.lng);
                    record.distance = Some(format_distance(meters));
                }

                PlaceFetch {
                    record,
                    reviews,
                    origin: FetchOrigin::Remote,
                }
            }
            PlaceSource::Fallback(entry) => PlaceFetch {
                record: PlaceRecord::from(&entry),
                reviews: Vec::new(),
                origin: FetchOrigin::Bundled,
            },
            PlaceSource::Missing => PlaceFetch {
                record: PlaceRecord::default(),
                reviews: Vec::new(),
                origin: FetchOrigin::Missing,
            },
        }
    }

    /// Picks the single source this load will use.
    ///
    /// An id that doesn't parse as a service key can never reach the remote
    /// service, so it goes straight to the string-keyed bundled lookup.
    async fn locate_source(&self, id: &str) -> PlaceSource {
        match id.parse::<u64>() {
            Ok(key) => match self.provider.fetch_details(key).await {
                Ok(response) => return PlaceSource::Remote(response),
                Err(e) => warn!("Place service fetch failed for '{}': {}", id, e),
            },
            Err(_) => warn!("Place id '{}' is not a service key; using bundled data", id),
        }

        match self.fallback.lookup(id) {
            Some(entry) => PlaceSource::Fallback(entry.clone()),
            None => {
                info!("No bundled entry for place '{}'", id);
                PlaceSource::Missing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FALLBACK_JSON: &str = r#"[
        {
            "id": "42",
            "name": "성수동 카페",
            "bookmark": true,
            "rating": 3.9,
            "distance": "1.1km",
            "industry": "카페",
            "address": "서울 성동구 연무장길 20",
            "images": ["https://img.example/seongsu.jpg"]
        }
    ]"#;

    fn fetcher(base_url: &str, fallback_json: &str) -> PlaceDetailFetcher {
        PlaceDetailFetcher::new(
            PlaceProvider::new(base_url, 10),
            FallbackStore::from_json(fallback_json).unwrap(),
        )
    }

    #[tokio::test]
    async fn remote_success_attaches_the_exact_formatted_distance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "성수동 카페",
                "rating": 4.6,
                "formattedAddress": "서울 성동구 연무장길 20",
                "lat": 37.5446,
                "lng": 127.0559,
                "photos": [{"url": "https://img.example/a.jpg"}]
            })))
            .mount(&server)
            .await;

        let viewer = Coordinate::new(37.5665, 126.9780);
        let fetch = fetcher(&server.uri(), "[]").fetch("42", Some(viewer)).await;

        let expected =
            format_distance(haversine_meters(37.5665, 126.9780, 37.5446, 127.0559));
        assert_eq!(fetch.origin, FetchOrigin::Remote);
        assert_eq!(fetch.record.distance, Some(expected));
        assert_eq!(fetch.record.industry, None);
    }

    #[tokio::test]
    async fn missing_viewer_coordinate_leaves_distance_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "성수동 카페",
                "lat": 37.5446,
                "lng": 127.0559
            })))
            .mount(&server)
            .await;

        let fetch = fetcher(&server.uri(), "[]").fetch("42", None).await;
        assert_eq!(fetch.record.distance, None);
    }

    #[tokio::test]
    async fn remote_record_without_coordinate_gets_no_distance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"name": "좌표 없는 가게"})),
            )
            .mount(&server)
            .await;

        let viewer = Coordinate::new(37.5665, 126.9780);
        let fetch = fetcher(&server.uri(), "[]").fetch("42", Some(viewer)).await;
        assert_eq!(fetch.record.distance, None);
    }

    #[tokio::test]
    async fn remote_failure_resolves_from_the_bundled_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/42"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetch = fetcher(&server.uri(), FALLBACK_JSON).fetch("42", None).await;

        assert_eq!(fetch.origin, FetchOrigin::Bundled);
        assert_eq!(fetch.record.name, "성수동 카페");
        assert_eq!(fetch.record.distance.as_deref(), Some("1.1km"));
        assert_eq!(fetch.record.industry.as_deref(), Some("카페"));
        assert!(fetch.record.bookmark);
        assert!(fetch.reviews.is_empty(), "reviews are remote-only");
    }

    #[tokio::test]
    async fn unknown_everywhere_yields_the_default_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetch = fetcher(&server.uri(), "[]").fetch("9999", None).await;

        assert_eq!(fetch.origin, FetchOrigin::Missing);
        assert_eq!(fetch.record, PlaceRecord::default());
        assert!(fetch.reviews.is_empty());
    }

    #[tokio::test]
    async fn non_numeric_id_skips_the_service_and_uses_bundled_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let json = r#"[{"id": "seongsu-1", "name": "성수동 카페"}]"#;
        let fetch = fetcher(&server.uri(), json).fetch("seongsu-1", None).await;

        assert_eq!(fetch.origin, FetchOrigin::Bundled);
        assert_eq!(fetch.record.name, "성수동 카페");
        server.verify().await;
    }

    #[tokio::test]
    async fn remote_reviews_ride_along_with_the_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "성수동 카페",
                "reviews": [
                    {"id": "r1", "authorName": "Kim", "rating": 4.5, "text": "great"},
                    {}
                ]
            })))
            .mount(&server)
            .await;

        let fetch = fetcher(&server.uri(), "[]").fetch("42", None).await;
        assert_eq!(fetch.reviews.len(), 2);
        assert_eq!(fetch.reviews[0].id.as_deref(), Some("r1"));
    }
}
