//! Wiring an application from TOML and dispatching through it.

use serde_json::json;
use switchyard::config::{parse_config, ConfigError};
use switchyard::host::build_app;
use switchyard::resilience::timeouts::HandlerTimeout;
use switchyard::{ConfigurationError, ErrorPolicy, Request};

const WIRING: &str = r#"
[dispatch]
error_policy = "recover"

[redaction]
headers = ["authorization"]
body_keys = ["password"]

[[middleware]]
name = "tag"
path = "/api/*/*"
action = { type = "set_header", name = "x-api", value = "yes" }

[[middleware]]
name = "deny-delete"
method = "delete"
action = { type = "fail", message = "deletes are disabled" }

[[endpoints]]
name = "new-user"
method = "get"
path = "/api/users/new"
action = { type = "respond", body = { form = true } }

[[endpoints]]
name = "show-user"
method = "get"
path = "/api/users/:id"
action = { type = "respond", status = 200, echo_params = true, body = { password = "hunter2" } }

[[endpoints]]
name = "broken"
path = "/api/broken"
action = { type = "fail", message = "backend down" }

[[error_routes]]
name = "render"
action = { type = "render_error", status = 503 }
"#;

fn app() -> switchyard::App {
    let config = parse_config(WIRING).unwrap();
    build_app(&config).unwrap()
}

#[test]
fn test_wiring_order() {
    let app = app();
    assert_eq!(app.policy(), ErrorPolicy::Recover);
    let names: Vec<_> = app.routes().iter().map(|r| r.name().unwrap_or("-").to_string()).collect();
    assert_eq!(names, ["tag", "deny-delete", "router.assign", "router.invoke"]);
    assert_eq!(app.error_routes().len(), 1);
}

#[tokio::test]
async fn test_literal_endpoint_wins() {
    let res = app().process_request(Request::new("get", "/api/users/new")).await.unwrap();
    assert_eq!(res.header("x-api"), Some("yes"));
    assert_eq!(res.body().as_value(), Some(&json!({ "form": true })));
    assert!(res.is_ended());
}

#[tokio::test]
async fn test_param_endpoint_echoes_and_redacts() {
    let config = parse_config(WIRING).unwrap();
    let app = build_app(&config).unwrap();

    let mut res = app.process_request(Request::new("get", "/API/Users/42")).await.unwrap();
    assert_eq!(
        res.body().as_value(),
        Some(&json!({ "password": "hunter2", "params": { "id": "42" } }))
    );

    res.set_redaction(Some(config.redaction.clone()));
    let rendered = res.rendered();
    assert_eq!(rendered["body"]["password"], "[REDACTED]");
    assert_eq!(rendered["body"]["params"]["id"], "42");
}

#[tokio::test]
async fn test_failures_render_through_error_route() {
    let res = app().process_request(Request::new("get", "/api/broken")).await.unwrap();
    assert_eq!(res.status_code(), 503);
    assert_eq!(res.body().as_value(), Some(&json!({ "error": "backend down" })));

    let res = app().process_request(Request::new("delete", "/api/users/1")).await.unwrap();
    assert_eq!(res.body().as_value(), Some(&json!({ "error": "deletes are disabled" })));
}

#[tokio::test]
async fn test_reject_policy_returns_error() {
    let wiring = WIRING.replace("\"recover\"", "\"reject\"");
    let app = build_app(&parse_config(&wiring).unwrap()).unwrap();
    let err = app.process_request(Request::new("get", "/api/broken")).await.unwrap_err();
    assert_eq!(err.to_string(), "backend down");
}

#[tokio::test(start_paused = true)]
async fn test_handler_timeout_applies_to_configured_routes() {
    let config = parse_config(
        r#"
        [dispatch]
        handler_timeout_ms = 10

        [[middleware]]
        name = "slow"
        action = { type = "delay", ms = 1000 }
        "#,
    )
    .unwrap();
    let app = build_app(&config).unwrap();

    let err = app.process_request(Request::new("get", "/")).await.unwrap_err();
    assert!(err.is::<HandlerTimeout>());
}

#[test]
fn test_duplicate_endpoints_fail_validation() {
    let err = parse_config(
        r#"
        [[endpoints]]
        name = "a"
        method = "get"
        path = "/x/:id"
        action = { type = "fail", message = "x" }

        [[endpoints]]
        name = "b"
        method = "GET"
        path = "/X/:id/"
        action = { type = "fail", message = "x" }
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_conflicting_parameters_fail_wiring() {
    let config = parse_config(
        r#"
        [[endpoints]]
        name = "a"
        path = "/x/:id"
        action = { type = "fail", message = "x" }

        [[endpoints]]
        name = "b"
        path = "/x/:key/edit"
        action = { type = "fail", message = "x" }
        "#,
    )
    .unwrap();
    let err = build_app(&config).unwrap_err();
    assert!(matches!(err, ConfigurationError::ConflictingParameter { position: 1, .. }));
}
