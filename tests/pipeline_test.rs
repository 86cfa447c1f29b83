//! Search pipeline tests
//!
//! Stubbed stages with call counters verify ordering, short-circuiting and
//! envelope assembly; a final group runs the real clients against mock
//! servers end to end.

use async_trait::async_trait;
use placeseek::llm::LlmError;
use placeseek::models::{Location, SearchRequest, LOCATIONS_FOUND_MESSAGE, NO_LOCATIONS_MESSAGE};
use placeseek::places::{PlaceSearch, PlacesError, MAX_RESULTS};
use placeseek::rewriter::QueryRewrite;
use placeseek::search::{PipelineStage, SearchError, SearchOrchestrator};
use placeseek::AppConfig;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Stubs
// =============================================================================

struct StubRewriter {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl StubRewriter {
    fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryRewrite for StubRewriter {
    async fn rewrite(&self, _query: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| LlmError::Network("connection refused".to_string()))
    }
}

/// Mimics the provider: returns `count` places, capped like the real client
struct StubPlaces {
    count: usize,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StubPlaces {
    fn with_results(count: usize) -> Arc<Self> {
        Arc::new(Self {
            count,
            fail: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            count: 0,
            fail: true,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceSearch for StubPlaces {
    async fn search(&self, query: &str) -> Result<Vec<Location>, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(PlacesError::MalformedEntry {
                index: 0,
                reason: "missing field `place_id`".to_string(),
            });
        }

        Ok((0..self.count.min(MAX_RESULTS))
            .map(|i| {
                Location::new(format!("p{i}"), format!("Place {i}"), "addr", 10.0, 20.0)
                    .unwrap()
                    .with_types(vec!["park".to_string()])
            })
            .collect())
    }
}

fn orchestrator(rewriter: Arc<StubRewriter>, places: Arc<StubPlaces>) -> SearchOrchestrator {
    SearchOrchestrator::new(rewriter, places)
}

fn request(query: &str) -> SearchRequest {
    SearchRequest::new(query).unwrap()
}

// =============================================================================
// Stubbed pipeline
// =============================================================================

#[tokio::test]
async fn test_location_count_is_min_of_cutoff_and_upstream() {
    for upstream in [0, 1, 4, 5, 6, 20] {
        let rewriter = StubRewriter::ok("parks");
        let places = StubPlaces::with_results(upstream);
        let response = orchestrator(rewriter, places)
            .search(&request("parks near me"))
            .await
            .unwrap();

        assert_eq!(response.locations.len(), upstream.min(5), "upstream = {upstream}");
    }
}

#[tokio::test]
async fn test_rewritten_query_is_passed_to_place_search() {
    let rewriter = StubRewriter::ok("Italian restaurant New York City");
    let places = StubPlaces::with_results(1);
    orchestrator(rewriter.clone(), places.clone())
        .search(&request("What's the best Italian restaurant in New York City"))
        .await
        .unwrap();

    assert_eq!(rewriter.calls(), 1);
    assert_eq!(places.calls(), 1);
    assert_eq!(
        *places.queries.lock().unwrap(),
        vec!["Italian restaurant New York City".to_string()]
    );
}

#[tokio::test]
async fn test_rewrite_failure_short_circuits() {
    let rewriter = StubRewriter::failing();
    let places = StubPlaces::with_results(3);
    let err = orchestrator(rewriter.clone(), places.clone())
        .search(&request("gas station"))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::UpstreamRewriteFailure(_)));
    assert_eq!(err.stage(), Some(PipelineStage::Rewriting));
    assert_eq!(rewriter.calls(), 1);
    assert_eq!(places.calls(), 0);
}

#[tokio::test]
async fn test_search_failure_propagates() {
    let rewriter = StubRewriter::ok("gym");
    let places = StubPlaces::failing();
    let err = orchestrator(rewriter, places.clone())
        .search(&request("gym"))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::UpstreamSearchFailure(_)));
    assert_eq!(err.stage(), Some(PipelineStage::Searching));
    assert_eq!(places.calls(), 1);
}

#[tokio::test]
async fn test_empty_result_is_success() {
    let response = orchestrator(StubRewriter::ok("x"), StubPlaces::with_results(0))
        .search(&request("middle of the ocean"))
        .await
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], NO_LOCATIONS_MESSAGE);
    assert_eq!(json["locations"], json!([]));
}

#[tokio::test]
async fn test_non_empty_result_message() {
    let response = orchestrator(StubRewriter::ok("x"), StubPlaces::with_results(2))
        .search(&request("parks"))
        .await
        .unwrap();

    assert_eq!(response.message, LOCATIONS_FOUND_MESSAGE);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let pipeline = orchestrator(StubRewriter::ok("coffee Seattle"), StubPlaces::with_results(8));

    let first = pipeline.search(&request("coffee in Seattle")).await.unwrap();
    let second = pipeline.search(&request("coffee in Seattle")).await.unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let rewriter = StubRewriter::ok("parks");
    let places = StubPlaces::with_results(3);
    let pipeline = Arc::new(orchestrator(rewriter.clone(), places.clone()));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.search_query(&format!("parks {i}")).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().locations.len(), 3);
    }
    assert_eq!(rewriter.calls(), 10);
    assert_eq!(places.calls(), 10);
}

#[tokio::test]
async fn test_invalid_query_never_reaches_stages() {
    let rewriter = StubRewriter::ok("x");
    let places = StubPlaces::with_results(1);
    let err = orchestrator(rewriter.clone(), places.clone())
        .search_query("")
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::InvalidRequest(_)));
    assert_eq!(rewriter.calls(), 0);
    assert_eq!(places.calls(), 0);
}

// =============================================================================
// Real clients against mock upstreams
// =============================================================================

async fn mock_rewrite(server: &MockServer, processed: &str) {
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "claude-test",
            "content": [{ "type": "text", "text": processed }]
        })))
        .mount(server)
        .await;
}

fn place(i: usize) -> serde_json::Value {
    json!({
        "name": format!("Park {i}"),
        "formatted_address": format!("{i} Park Ave"),
        "geometry": { "location": { "lat": 40.78, "lng": -73.96 } },
        "place_id": format!("park-{i}"),
        "types": ["park"]
    })
}

fn live_orchestrator(llm: &MockServer, maps: &MockServer) -> SearchOrchestrator {
    let config = AppConfig::default()
        .with_anthropic_api_key("llm-key")
        .with_anthropic_base_url(&llm.uri())
        .with_google_maps_api_key("maps-key")
        .with_places_base_url(&maps.uri());
    SearchOrchestrator::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_end_to_end_truncation() {
    let llm = MockServer::start().await;
    let maps = MockServer::start().await;
    mock_rewrite(&llm, "parks near Central Park").await;

    let results: Vec<_> = (0..8).map(place).collect();
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "parks near Central Park"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "results": results })),
        )
        .expect(1)
        .mount(&maps)
        .await;

    let response = live_orchestrator(&llm, &maps)
        .search_query("Show me parks near Central Park")
        .await
        .unwrap();

    let ids: Vec<&str> = response.locations.iter().map(|l| l.place_id()).collect();
    assert_eq!(ids, ["park-0", "park-1", "park-2", "park-3", "park-4"]);
    assert!(response.locations.iter().all(|l| l.rating().is_none()));
}

#[tokio::test]
async fn test_end_to_end_malformed_entry_fails_whole_call() {
    let llm = MockServer::start().await;
    let maps = MockServer::start().await;
    mock_rewrite(&llm, "parks").await;

    let mut broken = place(1);
    broken.as_object_mut().unwrap().remove("place_id");
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [place(0), broken, place(2)]
        })))
        .mount(&maps)
        .await;

    let err = live_orchestrator(&llm, &maps)
        .search_query("parks")
        .await
        .unwrap_err();

    match err {
        SearchError::UpstreamSearchFailure(PlacesError::MalformedEntry { index, .. }) => {
            assert_eq!(index, 1)
        }
        e => panic!("Expected malformed entry failure, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_end_to_end_rewrite_failure_skips_places() {
    let llm = MockServer::start().await;
    let maps = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&llm)
        .await;
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "results": [] })))
        .expect(0)
        .mount(&maps)
        .await;

    let err = live_orchestrator(&llm, &maps)
        .search_query("coffee")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SearchError::UpstreamRewriteFailure(LlmError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_end_to_end_zero_results() {
    let llm = MockServer::start().await;
    let maps = MockServer::start().await;
    mock_rewrite(&llm, "atlantis").await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&maps)
        .await;

    let response = live_orchestrator(&llm, &maps)
        .search_query("the lost city of atlantis")
        .await
        .unwrap();

    assert!(response.is_empty());
    assert_eq!(response.message, "No locations found");
}
