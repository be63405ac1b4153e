//! Widget fetching against a local site serving the theme REST endpoint

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;

use snap_pm::config::Config;
use snap_pm::core::{FetchError, WidgetType};
use snap_pm::transport::{RestClient, WidgetSource};
use snap_pm::ui_backend::{PersonalMenu, WidgetStatus};

#[derive(Default)]
struct Site {
    /// action -> (status, body)
    responses: Mutex<HashMap<String, (StatusCode, String)>>,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

impl Site {
    fn respond(&self, action: &str, status: StatusCode, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(action.to_string(), (status, body.to_string()));
    }
}

async fn rest(
    State(site): State<Arc<Site>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let action = query.get("action").cloned().unwrap_or_default();
    site.requests.lock().unwrap().push(query);
    site.responses
        .lock()
        .unwrap()
        .get(&action)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()))
}

async fn spawn_site() -> (String, Arc<Site>) {
    let site = Arc::new(Site::default());
    let app = Router::new()
        .route("/theme/snap/rest.php", get(rest))
        .with_state(site.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), site)
}

fn config_for(wwwroot: &str, cache_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.site.wwwroot = wwwroot.to_string();
    config.site.sesskey = "s3ss".to_string();
    config.site.context_id = 42;
    config.cache.dir = Some(cache_dir.to_path_buf());
    config.layout.course_ids = vec![11, 12];
    config
}

fn serve_all_widgets(site: &Site) {
    site.respond(
        "get_deadlines",
        StatusCode::OK,
        json!({"html": "<ul><li>Quiz 2 due Friday</li></ul>"}),
    );
    site.respond("get_graded", StatusCode::OK, json!({"html": "<li>Essay graded</li>"}));
    site.respond(
        "get_grading",
        StatusCode::OK,
        json!({"error": "Grading is not available", "errorcode": "nopermission"}),
    );
    site.respond("get_messages", StatusCode::OK, json!({"html": "<li>Hello from Ana</li>"}));
    site.respond("get_forumposts", StatusCode::OK, json!({}));
}

#[tokio::test]
async fn test_rest_client_sends_action_and_context() {
    let (wwwroot, site) = spawn_site().await;
    site.respond("get_messages", StatusCode::OK, json!({"html": "<p>hi</p>"}));
    let config = config_for(&wwwroot, std::path::Path::new("/unused"));

    let client = RestClient::new(&config.site, &config.http).unwrap();
    let payload = client.fetch(WidgetType::Messages).await.unwrap();

    assert_eq!(payload["html"], "<p>hi</p>");
    let requests = site.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["action"], "get_messages");
    assert_eq!(requests[0]["contextid"], "42");
}

#[tokio::test]
async fn test_rest_client_reports_http_status() {
    let (wwwroot, site) = spawn_site().await;
    site.respond("get_deadlines", StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let config = config_for(&wwwroot, std::path::Path::new("/unused"));

    let client = RestClient::new(&config.site, &config.http).unwrap();
    match client.fetch(WidgetType::Deadlines).await {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_opening_the_panel_refreshes_every_widget() {
    let (wwwroot, site) = spawn_site().await;
    serve_all_widgets(&site);
    let cache_dir = tempfile::tempdir().unwrap();
    let config = config_for(&wwwroot, cache_dir.path());

    let menu = PersonalMenu::from_config(&config).unwrap();
    let outcome = menu.controller.on_trigger_click();
    let cycle = outcome.refresh.expect("opening the panel starts a refresh");
    assert_eq!(cycle.widgets(), WidgetType::ALL.to_vec());
    cycle.join_fetches().await;

    let state = &menu.state;
    let deadlines = state.region(WidgetType::Deadlines).unwrap();
    assert_eq!(deadlines.content, "<ul><li>Quiz 2 due Friday</li></ul>");
    assert_eq!(deadlines.status, WidgetStatus::Loaded);

    let grading = state.region(WidgetType::Grading).unwrap();
    assert_eq!(
        grading.status,
        WidgetStatus::ServerError("Grading is not available".to_string())
    );
    assert_eq!(
        state.latest_notification().unwrap().message,
        "Grading is not available"
    );

    let forumposts = state.region(WidgetType::Forumposts).unwrap();
    assert!(forumposts.content.is_empty());

    assert_eq!(
        menu.cache.get("s3sspersonal-menu-messages").as_deref(),
        Some("<li>Hello from Ana</li>")
    );
    assert!(menu.cache.get("s3sspersonal-menu-grading").is_none());
    assert_eq!(site.requests.lock().unwrap().len(), 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stored_widgets_survive_a_failing_site() {
    let (wwwroot, site) = spawn_site().await;
    serve_all_widgets(&site);
    let cache_dir = tempfile::tempdir().unwrap();
    let config = config_for(&wwwroot, cache_dir.path());

    let first = PersonalMenu::from_config(&config).unwrap();
    first
        .controller
        .on_trigger_click()
        .refresh
        .unwrap()
        .join_fetches()
        .await;

    site.respond("get_messages", StatusCode::BAD_GATEWAY, json!({}));
    let second = PersonalMenu::from_config(&config).unwrap();
    second
        .controller
        .on_trigger_click()
        .refresh
        .unwrap()
        .join_fetches()
        .await;

    let messages = second.state.region(WidgetType::Messages).unwrap();
    assert_eq!(messages.content, "<li>Hello from Ana</li>");
    assert!(messages.from_cache);
    assert!(matches!(messages.status, WidgetStatus::Failed(_)));
    // Transport failures are not shown to the user
    assert!(second
        .state
        .notifications()
        .iter()
        .all(|n| n.message == "Grading is not available"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_session_does_not_see_old_cache() {
    let (wwwroot, site) = spawn_site().await;
    serve_all_widgets(&site);
    let cache_dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&wwwroot, cache_dir.path());

    let first = PersonalMenu::from_config(&config).unwrap();
    first
        .controller
        .on_trigger_click()
        .refresh
        .unwrap()
        .join_fetches()
        .await;

    config.site.sesskey = "fresh".to_string();
    let second = PersonalMenu::from_config(&config).unwrap();
    assert!(second.cache.get("s3sspersonal-menu-messages").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_site_policy_redirects_instead_of_fetching() {
    let (wwwroot, site) = spawn_site().await;
    serve_all_widgets(&site);
    let cache_dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&wwwroot, cache_dir.path());
    config.site.site_policy_accept_reqd = true;

    let menu = PersonalMenu::from_config(&config).unwrap();
    let cycle = menu.controller.on_trigger_click().refresh.unwrap();
    assert!(cycle.redirected);
    assert!(cycle.widgets().is_empty());

    assert_eq!(
        menu.state.location(),
        Some(format!("{}/user/policy.php", wwwroot))
    );
    assert!(site.requests.lock().unwrap().is_empty());
}
