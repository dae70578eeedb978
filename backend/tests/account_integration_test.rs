//! Integration tests for signup and login against PostgreSQL

mod common;

use axum::http::StatusCode;
use common::{unique_id, TestApp};

#[tokio::test]
#[ignore = "requires database"]
async fn test_student_signup_and_login() {
    let app = TestApp::new().await;
    let matric_number = unique_id("U");

    app.signup_student(&matric_number, "pw1").await;

    let response = app
        .post_form(
            "/student/login",
            &[("username", matric_number.as_str()), ("password", "pw1")],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/problems"));

    let logged_in: bool =
        sqlx::query_scalar("SELECT logged_in FROM students WHERE matric_number = $1")
            .bind(&matric_number)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert!(logged_in);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_password_is_stored_as_bcrypt_digest() {
    let app = TestApp::new().await;
    let matric_number = unique_id("U");

    app.signup_student(&matric_number, "pw1").await;

    let hash: String =
        sqlx::query_scalar("SELECT password_hash FROM students WHERE matric_number = $1")
            .bind(&matric_number)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert!(hash.starts_with("$2"));
    assert_ne!(hash, "pw1");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_wrong_password_redirects_to_signup() {
    let app = TestApp::new().await;
    let matric_number = unique_id("U");
    app.signup_student(&matric_number, "pw1").await;

    let response = app
        .post_form(
            "/student/login",
            &[("username", matric_number.as_str()), ("password", "wrong")],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/student/signup"));
    assert!(response.cookie.is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_duplicate_signup_conflicts() {
    let app = TestApp::new().await;
    let matric_number = unique_id("U");
    let fields = [
        ("name", "Ada Obi"),
        ("matric_number", matric_number.as_str()),
        ("password", "pw1"),
    ];

    let (first, second) = tokio::join!(
        app.post_form("/student/signup", &fields, None),
        app.post_form("/student/signup", &fields, None),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::SEE_OTHER, StatusCode::CONFLICT]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_hall_admin_signup_links_hall() {
    let app = TestApp::new().await;
    let hall = app.create_hall().await;
    let staff_id = unique_id("S");

    let cookie = app.admin_session(&staff_id, &hall).await;

    let admin_id: Option<String> = sqlx::query_scalar("SELECT admin_id FROM halls WHERE name = $1")
        .bind(&hall)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(admin_id.as_deref(), Some(staff_id.as_str()));

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["admin"]["staff_id"], staff_id.as_str());
    assert_eq!(body["admin"]["hall"], hall.as_str());
    assert!(body["halls"]
        .as_array()
        .unwrap()
        .iter()
        .any(|h| h["name"] == hall.as_str() && h["admin_id"] == staff_id.as_str()));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_hall_admin_signup_unknown_hall_creates_nothing() {
    let app = TestApp::new().await;
    let staff_id = unique_id("S");

    let response = app
        .post_form(
            "/halladmin/signup",
            &[
                ("name", "Bola Ade"),
                ("staff_id", staff_id.as_str()),
                ("hall", "No Such Hall"),
                ("password", "adminpw"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hall_admins WHERE staff_id = $1")
        .bind(&staff_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_hall_keeps_its_first_admin() {
    let app = TestApp::new().await;
    let hall = app.create_hall().await;
    let first = unique_id("S");
    let second = unique_id("S");
    app.admin_session(&first, &hall).await;

    let response = app
        .post_form(
            "/halladmin/signup",
            &[
                ("name", "Bola Ade"),
                ("staff_id", second.as_str()),
                ("hall", hall.as_str()),
                ("password", "adminpw"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let admin_id: Option<String> = sqlx::query_scalar("SELECT admin_id FROM halls WHERE name = $1")
        .bind(&hall)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(admin_id.as_deref(), Some(first.as_str()));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hall_admins WHERE staff_id = $1")
        .bind(&second)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_hall_admin_login_is_scoped_to_hall() {
    let app = TestApp::new().await;
    let hall = app.create_hall().await;
    let other_hall = app.create_hall().await;
    let staff_id = unique_id("S");
    app.admin_session(&staff_id, &hall).await;

    let path = hall_complaints_backend::routes::hall_admin_login_path(&other_hall);
    let response = app
        .post_form(&path, &[("username", staff_id.as_str()), ("password", "adminpw")], None)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.cookie.is_none());
}
