//! Employee endpoints through the full router

mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::{json, Value};

async fn two_accounts(ctx: &TestContext) -> (String, String) {
    let alice = ctx.register_and_login("Alice", "alice@example.com").await;
    let bob = ctx.register_and_login("Bob", "bob@example.com").await;
    (alice, bob)
}

fn ada() -> Value {
    json!({ "firstName": "Ada", "lastName": "Lovelace", "email": "ada@x.com", "salary": 5000 })
}

#[tokio::test]
async fn test_employee_routes_require_authentication() {
    let ctx = TestContext::new();
    let id = "00000000-0000-0000-0000-000000000001";

    let cases = [
        (Method::GET, "/api/employees".to_string(), None),
        (Method::POST, "/api/employees".to_string(), Some(ada())),
        (Method::GET, format!("/api/employees/{}", id), None),
        (Method::PATCH, format!("/api/employees/{}", id), Some(json!({}))),
        (Method::DELETE, format!("/api/employees/{}", id), None),
    ];

    for (method, uri, body) in cases {
        let response = ctx.request(method.clone(), &uri, None, body).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
    assert_eq!(ctx.store.employee_count().await, 0);
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let ctx = TestContext::new();
    let (alice, _) = two_accounts(&ctx).await;

    let record = ctx.create_employee(&alice, ada()).await;

    assert!(record["id"].is_string());
    assert_eq!(record["firstName"], "Ada");
    assert_eq!(record["department"], "IT");
    assert_eq!(record["status"], "Active");
    assert_eq!(record["salary"], 5000);
    assert_eq!(
        record["dateOfJoining"],
        chrono::Utc::now().date_naive().to_string()
    );

    let fetched = ctx
        .request(
            Method::GET,
            &format!("/api/employees/{}", record["id"].as_str().unwrap()),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, record);
}

#[tokio::test]
async fn test_create_missing_fields() {
    let ctx = TestContext::new();
    let (alice, _) = two_accounts(&ctx).await;

    let response = ctx
        .request(
            Method::POST,
            "/api/employees",
            Some(&alice),
            Some(json!({ "lastName": "Lovelace", "salary": "" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");
    assert_eq!(
        response.body["message"],
        "Missing required fields: firstName, email, salary"
    );
    assert_eq!(ctx.store.employee_count().await, 0);
}

#[tokio::test]
async fn test_duplicate_email_across_owners() {
    let ctx = TestContext::new();
    let (alice, bob) = two_accounts(&ctx).await;
    ctx.create_employee(&alice, ada()).await;

    let response = ctx
        .request(Method::POST, "/api/employees", Some(&bob), Some(ada()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "conflict");
    assert!(response.body["message"].as_str().unwrap().contains("ada@x.com"));
    assert_eq!(ctx.store.employee_count().await, 1);
}

#[tokio::test]
async fn test_list_is_scoped_with_stats() {
    let ctx = TestContext::new();
    let (alice, bob) = two_accounts(&ctx).await;

    let empty = ctx
        .request(Method::GET, "/api/employees", Some(&alice), None)
        .await;
    assert_eq!(
        empty.body,
        json!({ "employees": [], "stats": { "total": 0, "active": 0, "inactive": 0 } })
    );

    ctx.create_employee(&alice, ada()).await;
    ctx.create_employee(
        &alice,
        json!({ "firstName": "Grace", "lastName": "Hopper", "email": "grace@x.com", "salary": 6000, "status": "Inactive" }),
    )
    .await;
    ctx.create_employee(
        &bob,
        json!({ "firstName": "Linus", "email": "linus@x.com", "salary": 1 }),
    )
    .await;

    let listing = ctx
        .request(Method::GET, "/api/employees", Some(&alice), None)
        .await;

    assert_eq!(listing.status, StatusCode::OK);
    let names: Vec<&str> = listing.body["employees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["firstName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Grace", "Ada"]);
    assert_eq!(
        listing.body["stats"],
        json!({ "total": 2, "active": 1, "inactive": 1 })
    );
}

#[tokio::test]
async fn test_list_filters() {
    let ctx = TestContext::new();
    let (alice, _) = two_accounts(&ctx).await;
    ctx.create_employee(&alice, ada()).await;
    ctx.create_employee(
        &alice,
        json!({ "firstName": "Grace", "lastName": "Hopper", "email": "grace@x.com", "salary": 6000, "status": "Inactive" }),
    )
    .await;

    let search = ctx
        .request(Method::GET, "/api/employees?search=lovel", Some(&alice), None)
        .await;
    assert_eq!(search.body["employees"].as_array().unwrap().len(), 1);
    assert_eq!(search.body["employees"][0]["firstName"], "Ada");
    assert_eq!(search.body["stats"]["total"], 2);

    let inactive = ctx
        .request(Method::GET, "/api/employees?status=Inactive", Some(&alice), None)
        .await;
    assert_eq!(inactive.body["employees"].as_array().unwrap().len(), 1);
    assert_eq!(inactive.body["employees"][0]["firstName"], "Grace");

    let all = ctx
        .request(Method::GET, "/api/employees?status=All", Some(&alice), None)
        .await;
    assert_eq!(all.body["employees"].as_array().unwrap().len(), 2);

    let invalid = ctx
        .request(Method::GET, "/api/employees?status=Retired", Some(&alice), None)
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["error"], "validation_error");
}

#[tokio::test]
async fn test_update_moves_stats() {
    let ctx = TestContext::new();
    let (alice, _) = two_accounts(&ctx).await;
    let record = ctx.create_employee(&alice, ada()).await;
    let uri = format!("/api/employees/{}", record["id"].as_str().unwrap());

    let updated = ctx
        .request(
            Method::PATCH,
            &uri,
            Some(&alice),
            Some(json!({ "status": "Inactive", "designation": "Analyst", "id": "ignored", "createdAt": "2000-01-01T00:00:00Z" })),
        )
        .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["status"], "Inactive");
    assert_eq!(updated.body["designation"], "Analyst");
    assert_eq!(updated.body["id"], record["id"]);
    assert_eq!(updated.body["createdAt"], record["createdAt"]);

    let listing = ctx
        .request(Method::GET, "/api/employees", Some(&alice), None)
        .await;
    assert_eq!(
        listing.body["stats"],
        json!({ "total": 1, "active": 0, "inactive": 1 })
    );
}

#[tokio::test]
async fn test_update_email_conflict() {
    let ctx = TestContext::new();
    let (alice, bob) = two_accounts(&ctx).await;
    let record = ctx.create_employee(&alice, ada()).await;
    ctx.create_employee(
        &bob,
        json!({ "firstName": "Grace", "email": "grace@x.com", "salary": 6000 }),
    )
    .await;
    let uri = format!("/api/employees/{}", record["id"].as_str().unwrap());

    let response = ctx
        .request(Method::PATCH, &uri, Some(&alice), Some(json!({ "email": "grace@x.com" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "conflict");

    let same = ctx
        .request(Method::PATCH, &uri, Some(&alice), Some(json!({ "email": "ada@x.com" })))
        .await;
    assert_eq!(same.status, StatusCode::OK);
}

#[tokio::test]
async fn test_other_owner_sees_not_found() {
    let ctx = TestContext::new();
    let (alice, bob) = two_accounts(&ctx).await;
    let record = ctx.create_employee(&alice, ada()).await;
    let uri = format!("/api/employees/{}", record["id"].as_str().unwrap());

    let get = ctx.request(Method::GET, &uri, Some(&bob), None).await;
    let patch = ctx
        .request(Method::PATCH, &uri, Some(&bob), Some(json!({ "firstName": "Mallory" })))
        .await;
    let delete = ctx.request(Method::DELETE, &uri, Some(&bob), None).await;

    for response in [&get, &patch, &delete] {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["error"], "not_found");
    }

    let unchanged = ctx.request(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(unchanged.body, record);
}

#[tokio::test]
async fn test_delete() {
    let ctx = TestContext::new();
    let (alice, _) = two_accounts(&ctx).await;
    let record = ctx.create_employee(&alice, ada()).await;
    let uri = format!("/api/employees/{}", record["id"].as_str().unwrap());

    let deleted = ctx.request(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "message": "Employee deleted" }));

    let again = ctx.request(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let get = ctx.request(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.employee_count().await, 0);
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let ctx = TestContext::new();
    let (alice, _) = two_accounts(&ctx).await;

    let response = ctx
        .request(Method::GET, "/api/employees/not-a-uuid", Some(&alice), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
