mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use common::{
    bearer, cleanup_user, database_pool, init_app, login, register_user, token_service,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use todoguard::models::{Role, Todo};

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_alice_and_bob_scenario() {
    let pool = database_pool().await;
    let app = init_app(pool.clone()).await;
    cleanup_user(&pool, "alice").await;
    cleanup_user(&pool, "bob").await;

    let alice = register_user(&app, "alice", "password123", Role::User).await;
    let alice_token = login(&app, "alice", "password123").await;

    let req = test::TestRequest::get()
        .uri("/todo")
        .append_header(bearer(&alice_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = test::read_body_json(resp).await;
    assert!(todos.is_empty());

    let req = test::TestRequest::post()
        .uri("/todo")
        .append_header(bearer(&alice_token))
        .set_json(json!({
            "title": "Buy milk",
            "description": "2% milk",
            "priority": 2,
            "complete": false
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = test::read_body_json(resp).await;
    assert_eq!(created.owner_id, alice.id);
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.priority, 2);
    assert!(!created.complete);

    register_user(&app, "bob", "password123", Role::User).await;
    let bob_token = login(&app, "bob", "password123").await;

    let req = test::TestRequest::get()
        .uri(&format!("/todo/{}", created.id))
        .append_header(bearer(&bob_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    cleanup_user(&pool, "alice").await;
    cleanup_user(&pool, "bob").await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_todo_crud_flow() {
    let pool = database_pool().await;
    let app = init_app(pool.clone()).await;
    let username = "crud_user";
    cleanup_user(&pool, username).await;

    let user = register_user(&app, username, "password123", Role::User).await;
    let token = login(&app, username, "password123").await;

    // 1. Create
    let req = test::TestRequest::post()
        .uri("/todo")
        .append_header(bearer(&token))
        .set_json(json!({
            "title": "Original title",
            "description": "Initial description",
            "priority": 3,
            "complete": false
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = test::read_body_json(resp).await;
    assert_eq!(created.owner_id, user.id);

    // 2. Read
    let req = test::TestRequest::get()
        .uri(&format!("/todo/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    // 3. Update
    let req = test::TestRequest::put()
        .uri(&format!("/todo/{}", created.id))
        .append_header(bearer(&token))
        .set_json(json!({
            "title": "Updated title",
            "description": "Updated description",
            "priority": 5,
            "complete": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = test::read_body_json(resp).await;
    assert_eq!(
        updated,
        Todo {
            id: created.id,
            title: "Updated title".to_string(),
            description: "Updated description".to_string(),
            priority: 5,
            complete: true,
            owner_id: user.id,
        }
    );

    // 4. List
    let req = test::TestRequest::get()
        .uri("/todo")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let todos: Vec<Todo> = test::read_body_json(resp).await;
    assert_eq!(todos, vec![updated.clone()]);

    // 5. Delete, then it is gone
    let req = test::TestRequest::delete()
        .uri(&format!("/todo/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/todo/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/todo/{}", created.id))
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    cleanup_user(&pool, username).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ownership_isolation() {
    let pool = database_pool().await;
    let app = init_app(pool.clone()).await;
    let owner = "owner_user_a";
    let other = "other_user_b";
    cleanup_user(&pool, owner).await;
    cleanup_user(&pool, other).await;

    register_user(&app, owner, "password123", Role::User).await;
    register_user(&app, other, "password123", Role::User).await;
    let owner_token = login(&app, owner, "password123").await;
    let other_token = login(&app, other, "password123").await;

    let req = test::TestRequest::post()
        .uri("/todo")
        .append_header(bearer(&owner_token))
        .set_json(json!({
            "title": "Owner's todo",
            "description": "Private to the owner",
            "priority": 4,
            "complete": false
        }))
        .to_request();
    let todo: Todo = test::read_body_json(test::call_service(&app, req).await).await;

    // The other user does not see it in their list
    let req = test::TestRequest::get()
        .uri("/todo")
        .append_header(bearer(&other_token))
        .to_request();
    let todos: Vec<Todo> = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(!todos.iter().any(|t| t.id == todo.id));

    // A foreign id answers exactly like an id that does not exist
    let missing_id = i32::MAX;
    for method in ["GET", "PUT", "DELETE"] {
        let mut outcomes = Vec::new();
        for id in [todo.id, missing_id] {
            let uri = format!("/todo/{}", id);
            let req = match method {
                "GET" => test::TestRequest::get().uri(&uri),
                "PUT" => test::TestRequest::put().uri(&uri).set_json(json!({
                    "title": "Hijacked",
                    "description": "Attempted update",
                    "priority": 1,
                    "complete": true
                })),
                _ => test::TestRequest::delete().uri(&uri),
            };
            let req = req.append_header(bearer(&other_token)).to_request();
            let resp = test::call_service(&app, req).await;
            let status = resp.status();
            outcomes.push((status, test::read_body(resp).await));
        }
        assert_eq!(outcomes[0].0, StatusCode::NOT_FOUND, "{} on foreign todo", method);
        assert_eq!(outcomes[0], outcomes[1], "{} leaks existence", method);
    }

    // The owner's todo is untouched
    let req = test::TestRequest::get()
        .uri(&format!("/todo/{}", todo.id))
        .append_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = test::read_body_json(resp).await;
    assert_eq!(fetched, todo);

    cleanup_user(&pool, owner).await;
    cleanup_user(&pool, other).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_admin_override() {
    let pool = database_pool().await;
    let app = init_app(pool.clone()).await;
    let owner = "admin_case_owner";
    let admin = "admin_case_admin";
    cleanup_user(&pool, owner).await;
    cleanup_user(&pool, admin).await;

    register_user(&app, owner, "password123", Role::User).await;
    register_user(&app, admin, "password123", Role::Admin).await;
    let owner_token = login(&app, owner, "password123").await;
    let admin_token = login(&app, admin, "password123").await;

    let mut created = Vec::new();
    for title in ["First owned todo", "Second owned todo"] {
        let req = test::TestRequest::post()
            .uri("/todo")
            .append_header(bearer(&owner_token))
            .set_json(json!({
                "title": title,
                "description": "Created by the owner",
                "priority": 1,
                "complete": false
            }))
            .to_request();
        let todo: Todo = test::read_body_json(test::call_service(&app, req).await).await;
        created.push(todo);
    }

    // Admin listing covers every owner
    let req = test::TestRequest::get()
        .uri("/admin/todo")
        .append_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let all: Vec<Todo> = test::read_body_json(resp).await;
    assert!(created.iter().all(|c| all.contains(c)));

    // The admin's /todo listing drops the owner filter too
    let req = test::TestRequest::get()
        .uri("/todo")
        .append_header(bearer(&admin_token))
        .to_request();
    let listed: Vec<Todo> = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(created.iter().all(|c| listed.contains(c)));

    // By-id operations drop the owner filter for admins
    let req = test::TestRequest::put()
        .uri(&format!("/todo/{}", created[0].id))
        .append_header(bearer(&admin_token))
        .set_json(json!({
            "title": "Closed by admin",
            "description": "Created by the owner",
            "priority": 1,
            "complete": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = test::read_body_json(resp).await;
    assert_eq!(updated.owner_id, created[0].owner_id);
    assert!(updated.complete);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/todo/{}", created[1].id))
        .append_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/todo/{}", created[1].id))
        .append_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The owner only has the first todo left
    let req = test::TestRequest::get()
        .uri("/todo")
        .append_header(bearer(&owner_token))
        .to_request();
    let remaining: Vec<Todo> = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(remaining, vec![updated]);

    cleanup_user(&pool, owner).await;
    cleanup_user(&pool, admin).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_token_of_deleted_user_cannot_create_todos() {
    let pool = database_pool().await;
    let app = init_app(pool.clone()).await;
    let username = "deleted_owner";
    cleanup_user(&pool, username).await;

    let user = register_user(&app, username, "password123", Role::User).await;
    let token = token_service()
        .issue(user.id, username, Role::User, Duration::minutes(30))
        .unwrap();
    cleanup_user(&pool, username).await;

    let req = test::TestRequest::post()
        .uri("/todo")
        .append_header(bearer(&token))
        .set_json(json!({
            "title": "Orphaned todo",
            "description": "Owner no longer exists",
            "priority": 3,
            "complete": false
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Could not validate credentials" }));
}
