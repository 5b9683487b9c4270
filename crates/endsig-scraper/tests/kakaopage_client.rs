//! Integration tests for `KakaopageSource` against a local `wiremock`
//! GraphQL endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use endsig_core::ContentStatus;
use endsig_scraper::{
    fetch_all, ClientSettings, KakaopageSource, ListingSource, ListingView, RetryPolicy,
    ScraperError,
};

fn source(server: &MockServer, max_attempts: u32) -> KakaopageSource {
    let settings = ClientSettings {
        timeout_secs: 5,
        user_agent: "endsig-test/0.1".to_string(),
        retry: RetryPolicy::immediate(max_attempts),
    };
    KakaopageSource::new(&format!("{}/graphql", server.uri()), &settings)
        .expect("failed to build test KakaopageSource")
}

fn series(id: i64, title: &str, badge: Option<&str>) -> serde_json::Value {
    json!({
        "id": format!("s{id}"),
        "seriesId": id,
        "title": title,
        "thumbnail": format!("https://img.example/{id}.png"),
        "statusBadge": badge,
        "authors": [{"name": "작가", "type": "AUTHOR"}]
    })
}

fn day_body(items: Vec<serde_json::Value>, is_end: bool) -> serde_json::Value {
    json!({
        "data": {
            "staticLandingDayOfWeekLayout": {
                "sections": [{"isEnd": is_end, "items": [{"items": items}]}]
            }
        }
    })
}

fn finished_body(items: Vec<serde_json::Value>, is_end: bool) -> serde_json::Value {
    json!({
        "data": {
            "staticLandingGenreSection": {"isEnd": is_end, "items": [{"items": items}]}
        }
    })
}

fn day_request(uid: &str, page: u32) -> serde_json::Value {
    json!({"variables": {"queryInput": {"dayTabUid": uid, "page": page}}})
}

fn finished_request(page: u32) -> serde_json::Value {
    json!({"variables": {"param": {"isComplete": true, "page": page}}})
}

#[tokio::test]
async fn day_tab_page_sends_graphql_headers_and_reads_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("referer", "https://page.kakao.com/"))
        .and(header("accept", "application/graphql+json, application/json"))
        .and(body_partial_json(day_request("1", 1)))
        .respond_with(ResponseTemplate::new(200).set_body_json(day_body(
            vec![series(100, "A", None), series(101, "B", Some("BadgeRest휴재"))],
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let page = source(&server, 1)
        .fetch_page(&ListingView::weekday("1", "mon"), 1)
        .await
        .expect("day page");

    assert!(page.has_more);
    assert_eq!(page.items.len(), 2);
    assert!(!page.items[0].raw_status.is_resting());
    assert!(page.items[1].raw_status.is_resting());
}

#[tokio::test]
async fn graphql_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Cannot query field"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = source(&server, 3)
        .fetch_page(&ListingView::Finished, 1)
        .await;

    match result {
        Err(ScraperError::GraphQl { message, .. }) => {
            assert!(message.contains("Cannot query field"));
        }
        other => panic!("expected GraphQl error, got: {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_body(
            vec![series(7, "Done", None)],
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let page = source(&server, 3)
        .fetch_page(&ListingView::Finished, 1)
        .await
        .expect("finished page after retry");

    assert!(!page.has_more);
    assert_eq!(page.items[0].external_id, "7");
}

#[tokio::test]
async fn missing_section_is_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"staticLandingDayOfWeekLayout": {"sections": []}}
        })))
        .mount(&server)
        .await;

    let page = source(&server, 1)
        .fetch_page(&ListingView::weekday("3", "wed"), 4)
        .await
        .expect("empty page");

    assert!(page.items.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn full_aggregation_pages_day_tabs_and_finished_feed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(day_request("1", 1)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(day_body(vec![series(1, "Mon", None)], false)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(day_request("1", 2)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(day_body(vec![series(2, "Mon 2", None)], true)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(day_request("4", 1)))
        .respond_with(ResponseTemplate::new(200).set_body_json(day_body(
            vec![series(1, "Mon", None), series(3, "Resting", Some("휴재"))],
            true,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(day_request("8", 1)))
        .respond_with(ResponseTemplate::new(200).set_body_json(day_body(
            vec![series(5, "Rest Tab Only", Some("휴재"))],
            true,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(finished_request(1)))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_body(
            vec![series(3, "Resting", None), series(9, "Done", None)],
            false,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(finished_request(2)))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished_body(
            vec![series(9, "Done", None)],
            true,
        )))
        .mount(&server)
        .await;
    // Remaining day tabs are empty.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(day_body(Vec::new(), true)))
        .mount(&server)
        .await;

    let source = source(&server, 1);
    let snapshot = fetch_all(&source, Duration::ZERO).await;

    assert_eq!(snapshot.all.len(), 5);
    assert_eq!(snapshot.status_of("1"), ContentStatus::Ongoing);
    assert_eq!(snapshot.status_of("2"), ContentStatus::Ongoing);
    assert_eq!(snapshot.status_of("3"), ContentStatus::Hiatus);
    assert_eq!(snapshot.status_of("9"), ContentStatus::Finished);
    assert_eq!(
        snapshot.all["1"].weekdays,
        vec!["mon".to_string(), "thu".to_string()]
    );
    assert!(snapshot.all["9"].weekdays.is_empty());
    assert_eq!(snapshot.status_of("5"), ContentStatus::Hiatus);
    assert_eq!(snapshot.all["5"].weekdays, vec!["hiatus".to_string()]);
}
