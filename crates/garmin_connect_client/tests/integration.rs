use garmin_connect_client::http_client::ReqwestGarminClient;
use garmin_connect_client::{Credentials, GarminClient, GarminError};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SIGNIN_PAGE: &str = r#"<html><script>var response_url = "http://connect/modern/?ticket=ST-0042-xyz-cas";</script></html>"#;

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .and(body_string_contains("password=hunter2"))
        .and(body_string_contains("embed=true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SIGNIN_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/modern/"))
        .and(query_param("ticket", "ST-0042-xyz-cas"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "SESSIONID=abc; Path=/"))
        .mount(server)
        .await;
}

async fn logged_in_client(server: &MockServer) -> ReqwestGarminClient {
    mount_login(server).await;
    let client = ReqwestGarminClient::new(&server.uri(), &server.uri()).expect("client");
    client
        .authenticate(&Credentials::new("me@example.com", "hunter2"))
        .await
        .expect("login");
    client
}

#[tokio::test]
async fn authenticate_exchanges_ticket_and_returns_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let client = ReqwestGarminClient::new(&server.uri(), &server.uri()).expect("client");
    let token = client
        .authenticate(&Credentials::new("me@example.com", "hunter2"))
        .await
        .expect("token");
    assert_eq!(token.expose(), "ST-0042-xyz-cas");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    let form = String::from_utf8_lossy(&received[0].body).to_string();
    assert!(form.contains("username=me%40example.com"));
}

#[tokio::test]
async fn authenticate_without_ticket_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Invalid sign in</html>"))
        .mount(&server)
        .await;

    let client = ReqwestGarminClient::new(&server.uri(), &server.uri()).expect("client");
    let err = client
        .authenticate(&Credentials::new("me@example.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, GarminError::Auth(_)));
    // No ticket means no exchange call.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn authenticate_rejected_status_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_string("locked"))
        .mount(&server)
        .await;

    let client = ReqwestGarminClient::new(&server.uri(), &server.uri()).expect("client");
    let err = client
        .authenticate(&Credentials::new("", ""))
        .await
        .unwrap_err();
    match err {
        GarminError::Auth(msg) => assert!(msg.contains("401")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn list_activities_sends_limit_and_preserves_order() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {"activityId": 30, "activityName": "Ride"},
        {"activityId": 10, "activityName": "Run"},
        {"activityId": 20, "activityName": "Swim"}
    ]);
    Mock::given(method("GET"))
        .and(path("/activitylist-service/activities/search/activities"))
        .and(query_param("start", "0"))
        .and(query_param("limit", "3"))
        .and(header("NK", "NT"))
        .and(header("X-Session-Ticket", "ST-0042-xyz-cas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let acts = client.list_activities(3).await.expect("activities");
    let ids: Vec<&str> = acts.iter().map(|a| a.id()).collect();
    assert_eq!(ids, ["30", "10", "20"]);
    assert_eq!(acts[1].fields()["activityName"], "Run");
}

#[tokio::test]
async fn list_activities_reports_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activitylist-service/activities/search/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"error\":\"maintenance\"}"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    match client.list_activities(10).await {
        Err(GarminError::Decode(msg)) => assert!(msg.contains("maintenance")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_track_returns_body_verbatim() {
    let server = MockServer::start().await;
    let gpx = "<?xml version=\"1.0\"?>\n<gpx><trk><name>Run</name></trk></gpx>\n";
    Mock::given(method("GET"))
        .and(path("/download-service/export/gpx/activity/10"))
        .and(header("NK", "NT"))
        .respond_with(ResponseTemplate::new(200).set_body_string(gpx))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let track = client.fetch_track("10").await.expect("track");
    assert_eq!(track, gpx);
}

#[tokio::test]
async fn fetch_track_keeps_reserved_characters_inside_the_id_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-service/export/gpx/activity/a%3Fb%23c%2Fd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<gpx/>"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    assert_eq!(client.fetch_track("a?b#c/d").await.expect("track"), "<gpx/>");

    let received = server.received_requests().await.unwrap();
    let export = received.last().expect("export request");
    assert_eq!(export.url.query(), None);
    assert_eq!(export.url.fragment(), None);
}

#[tokio::test]
async fn fetch_track_unknown_id_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-service/export/gpx/activity/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such activity"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    match client.fetch_track("missing").await {
        Err(GarminError::NotFound(body)) => assert_eq!(body, "no such activity"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_keep_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-service/export/gpx/activity/7"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    assert!(matches!(
        client.fetch_track("7").await,
        Err(GarminError::Status { status: 503, .. })
    ));
}
