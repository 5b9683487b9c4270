//! Integration tests for `NaverWebtoonSource` against a local `wiremock`
//! server. No real network traffic is made.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use endsig_core::ContentStatus;
use endsig_scraper::{
    fetch_all, ClientSettings, ListingSource, ListingView, NaverWebtoonSource, RetryPolicy,
    ScraperError,
};

fn settings(max_attempts: u32) -> ClientSettings {
    ClientSettings {
        timeout_secs: 5,
        user_agent: "endsig-test/0.1".to_string(),
        retry: RetryPolicy::immediate(max_attempts),
    }
}

fn source(server: &MockServer, max_attempts: u32) -> NaverWebtoonSource {
    NaverWebtoonSource::new(&format!("{}/titlelist", server.uri()), &settings(max_attempts))
        .expect("failed to build test NaverWebtoonSource")
}

fn title(id: i64, name: &str, rest: bool) -> serde_json::Value {
    json!({
        "titleId": id,
        "titleName": name,
        "author": "글 / 그림",
        "thumbnailUrl": format!("https://img.example/{id}.jpg"),
        "rest": rest
    })
}

#[tokio::test]
async fn weekday_page_parses_title_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .and(query_param("week", "mon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "titleList": [title(1, "A", false), title(2, "B", true)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = source(&server, 1)
        .fetch_page(&ListingView::weekday("mon", "mon"), 1)
        .await
        .expect("weekday page");

    assert!(!page.has_more);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].external_id, "1");
    assert_eq!(page.items[0].authors, vec!["글", "그림"]);
    assert!(page.items[1].raw_status.is_resting());
}

#[tokio::test]
async fn finished_page_sends_pagination_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/titlelist/finished"))
        .and(query_param("order", "UPDATE"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [title(5, "E", false)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = source(&server, 1)
        .fetch_page(&ListingView::Finished, 2)
        .await
        .expect("finished page");

    assert!(page.has_more);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn server_error_is_retried_then_wrapped_in_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let result = source(&server, 3)
        .fetch_page(&ListingView::weekday("tue", "tue"), 1)
        .await;

    match result {
        Err(ScraperError::FetchFailure {
            source_name,
            attempts,
            cause,
            ..
        }) => {
            assert_eq!(source_name, "naver_webtoon");
            assert_eq!(attempts, 3);
            assert!(matches!(
                *cause,
                ScraperError::UnexpectedStatus { status: 500, .. }
            ));
        }
        other => panic!("expected FetchFailure, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = source(&server, 3)
        .fetch_page(&ListingView::weekday("wed", "wed"), 1)
        .await;

    assert!(matches!(result, Err(ScraperError::Deserialize { .. })));
}

#[tokio::test]
async fn slow_response_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"titleList": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut settings = settings(1);
    settings.timeout_secs = 1;
    let source = NaverWebtoonSource::new(&format!("{}/titlelist", server.uri()), &settings)
        .expect("source");

    let result = source
        .fetch_page(&ListingView::weekday("thu", "thu"), 1)
        .await;

    assert!(matches!(result, Err(ScraperError::FetchFailure { .. })));
}

#[tokio::test]
async fn full_aggregation_merges_daily_plus_into_daily() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .and(query_param("week", "daily"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "titleList": [title(10, "Daily", false)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .and(query_param("week", "dailyPlus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "titleList": [title(10, "Daily", false), title(11, "Plus", false)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .and(query_param("week", "mon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "titleList": [title(1, "Monday", false)]
        })))
        .mount(&server)
        .await;
    // Every other weekday is empty.
    Mock::given(method("GET"))
        .and(path("/titlelist/weekday"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"titleList": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/titlelist/finished"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "titleList": [title(1, "Monday", false), title(2, "Done", false)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/titlelist/finished"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"titleList": []})))
        .mount(&server)
        .await;

    let source = source(&server, 1);
    let snapshot = fetch_all(&source, Duration::ZERO).await;

    assert_eq!(snapshot.all.len(), 4);
    assert_eq!(snapshot.status_of("1"), ContentStatus::Ongoing);
    assert_eq!(snapshot.status_of("2"), ContentStatus::Finished);
    assert_eq!(snapshot.all["10"].weekdays, vec!["daily".to_string()]);
    assert_eq!(snapshot.all["11"].weekdays, vec!["daily".to_string()]);
    assert_eq!(snapshot.all["1"].weekdays, vec!["mon".to_string()]);
}
