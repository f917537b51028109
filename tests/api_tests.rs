use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use clubhouse::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Join passcode from the default config
const JOIN_PASSCODE: &str = "open%20sesame";
/// Admin passcode from the default config
const ADMIN_PASSCODE: &str = "change-me";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // One connection so every request sees the same in-memory database
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.server.secure_cookies = false;

    let state = clubhouse::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    clubhouse::api::router(state)
        .await
        .expect("Failed to build router")
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn session_cookie(response: &Response<axum::body::Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(';').next())
        .map(ToString::to_string)
}

async fn body_string(response: Response<axum::body::Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn signup(app: &Router, first: &str, last: &str, username: &str, password: &str) {
    let body = format!(
        "firstName={first}&lastName={last}&username={username}&password={password}&passwordConfirmation={password}"
    );
    let response = app
        .clone()
        .oneshot(form_request("/sign-up", &body, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("You have successfully signed up!"));
}

async fn join(app: &Router, username: &str, password: &str, passcode: &str) -> StatusCode {
    let body = format!("username={username}&password={password}&secretPasscode={passcode}");
    let response = app
        .clone()
        .oneshot(form_request("/join", &body, None))
        .await
        .unwrap();
    response.status()
}

/// Log in and return the session cookie on success
async fn login(app: &Router, username: &str, password: &str) -> Option<String> {
    let body = format!("username={username}&password={password}");
    let response = app
        .clone()
        .oneshot(form_request("/login", &body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    if location == "/login-success" {
        Some(session_cookie(&response).expect("login should set a session cookie"))
    } else {
        assert_eq!(location, "/login-failure");
        None
    }
}

#[tokio::test]
async fn test_homepage_renders_for_anonymous_visitors() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get_request("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Clubhouse"));
    assert!(html.contains("No messages yet."));
    assert!(html.contains("/sign-up"));
    assert!(html.contains("/login"));
}

#[tokio::test]
async fn test_signup_validation_rerenders_form() {
    let app = spawn_app().await;

    // Weak password fails every complexity rule
    let body = "firstName=Jane&lastName=Doe&username=jane@x.com&password=weak&passwordConfirmation=weak";
    let response = app
        .clone()
        .oneshot(form_request("/sign-up", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Invalid value(s) in fields. Please try again."));

    // Mismatched confirmation is rejected even with a strong password
    let body = "firstName=Jane&lastName=Doe&username=jane@x.com&password=Abc12345!&passwordConfirmation=Abc12345?";
    let response = app
        .clone()
        .oneshot(form_request("/sign-up", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Invalid value(s) in fields. Please try again."));
}

#[tokio::test]
async fn test_join_failure_taxonomy() {
    let app = spawn_app().await;

    signup(&app, "Jane", "Doe", "jane@x.com", "Abc12345!").await;

    // Unknown account and wrong password collapse to the same 401
    assert_eq!(
        join(&app, "nobody@x.com", "Abc12345!", JOIN_PASSCODE).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        join(&app, "jane@x.com", "WrongPass1!", JOIN_PASSCODE).await,
        StatusCode::UNAUTHORIZED
    );

    // Passcode comparison is exact and case-sensitive
    assert_eq!(
        join(&app, "jane@x.com", "Abc12345!", "Open%20Sesame").await,
        StatusCode::FORBIDDEN
    );

    assert_eq!(
        join(&app, "jane@x.com", "Abc12345!", JOIN_PASSCODE).await,
        StatusCode::OK
    );

    // A joined member no longer matches the unjoined lookup
    assert_eq!(
        join(&app, "jane@x.com", "Abc12345!", JOIN_PASSCODE).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_login_requires_membership() {
    let app = spawn_app().await;

    signup(&app, "Jane", "Doe", "jane@x.com", "Abc12345!").await;

    // Signed up but not joined
    assert!(login(&app, "jane@x.com", "Abc12345!").await.is_none());

    assert_eq!(
        join(&app, "jane@x.com", "Abc12345!", JOIN_PASSCODE).await,
        StatusCode::OK
    );

    // Wrong password still fails after joining
    assert!(login(&app, "jane@x.com", "WrongPass1!").await.is_none());

    let cookie = login(&app, "jane@x.com", "Abc12345!")
        .await
        .expect("login should succeed after joining");

    let response = app
        .clone()
        .oneshot(get_request("/login-success", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("You successfully logged in."));
    assert!(html.contains("Logged in as Jane Doe"));
}

#[tokio::test]
async fn test_login_failure_page() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/login-failure", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Login failed."));
}

#[tokio::test]
async fn test_logout_clears_identity() {
    let app = spawn_app().await;

    signup(&app, "Jane", "Doe", "jane@x.com", "Abc12345!").await;
    join(&app, "jane@x.com", "Abc12345!", JOIN_PASSCODE).await;
    let cookie = login(&app, "jane@x.com", "Abc12345!").await.unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("You successfully logged out."));

    // The session no longer authenticates protected pages
    let response = app
        .clone()
        .oneshot(get_request("/new-message", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_message_creation_requires_login() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(form_request("/new-message", "title=hi&text=there", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/new-message", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_message_lifecycle() {
    let app = spawn_app().await;

    signup(&app, "Jane", "Doe", "jane@x.com", "Abc12345!").await;
    join(&app, "jane@x.com", "Abc12345!", JOIN_PASSCODE).await;
    let cookie = login(&app, "jane@x.com", "Abc12345!").await.unwrap();

    // Empty title re-renders the form
    let response = app
        .clone()
        .oneshot(form_request("/new-message", "title=&text=body", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Title and text are required."));

    let response = app
        .clone()
        .oneshot(form_request(
            "/new-message",
            "title=Hello%20club&text=First%20post",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("You have successfully created a message!"));
    assert!(html.contains("Hello club"));

    // Visible to anonymous visitors, author and date included
    let response = app.clone().oneshot(get_request("/", None)).await.unwrap();
    let html = body_string(response).await;
    assert!(html.contains("Hello club"));
    assert!(html.contains("Jane Doe"));

    // Non-admins cannot delete
    let response = app
        .clone()
        .oneshot(form_request("/message/1/delete", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_grant_and_delete() {
    let app = spawn_app().await;

    signup(&app, "Jane", "Doe", "jane@x.com", "Abc12345!").await;
    join(&app, "jane@x.com", "Abc12345!", JOIN_PASSCODE).await;
    let cookie = login(&app, "jane@x.com", "Abc12345!").await.unwrap();

    app.clone()
        .oneshot(form_request(
            "/new-message",
            "title=Target&text=to%20be%20deleted",
            Some(&cookie),
        ))
        .await
        .unwrap();

    // The admin form requires a session
    let response = app
        .clone()
        .oneshot(get_request("/login-success/admin", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/login-success/admin", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong admin passcode
    let response = app
        .clone()
        .oneshot(form_request(
            "/login-success/admin",
            "adminPasscode=wrong",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(form_request(
            "/login-success/admin",
            &format!("adminPasscode={ADMIN_PASSCODE}"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("You have successfully gained admin access!"));
    // The homepage now carries delete controls
    assert!(html.contains("/message/1/delete"));

    let response = app
        .clone()
        .oneshot(form_request("/message/1/delete", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("You have successfully deleted a message."));

    let response = app.clone().oneshot(get_request("/", None)).await.unwrap();
    let html = body_string(response).await;
    assert!(!html.contains("Target"));
}

#[tokio::test]
async fn test_seeded_admin_can_log_in() {
    let app = spawn_app().await;

    let cookie = login(&app, "admin@clubhouse.local", "password")
        .await
        .expect("seeded admin should log in");

    let response = app
        .clone()
        .oneshot(get_request("/login-success", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Logged in as Club Admin"));
}
