//! E2E tests for the follow graph

mod common;

use common::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_follow_and_unfollow() {
    let server = TestServer::new().await;
    let (alice_token, _) = server.register("alice").await;
    server.register("bob").await;
    let follow_url = server.url("/api/v1/profiles/bob/follow");

    let body: serde_json::Value = server
        .client
        .post(&follow_url)
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "following": true, "created": true }));

    let body: serde_json::Value = server
        .client
        .post(&follow_url)
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "following": true, "created": false }));

    let (status, followers) = server.get_json("/api/v1/profiles/bob/followers", None).await;
    assert_eq!(status, 200);
    assert_eq!(followers.as_array().unwrap().len(), 1);
    assert_eq!(followers[0]["username"], "alice");

    let (_, following) = server.get_json("/api/v1/profiles/alice/following", None).await;
    assert_eq!(following[0]["username"], "bob");

    let body: serde_json::Value = server
        .client
        .delete(&follow_url)
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "following": false, "removed": true }));

    let (_, followers) = server.get_json("/api/v1/profiles/bob/followers", None).await;
    assert!(followers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let server = TestServer::new().await;
    let (token, _) = server.register("alice").await;

    let response = server
        .client
        .post(server.url("/api/v1/profiles/alice/follow"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let (_, body) = server.get_json("/api/v1/profiles/alice", None).await;
    assert_eq!(body["follower_count"], 0);
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let server = TestServer::new().await;
    let (token, _) = server.register("alice").await;

    let response = server
        .client
        .post(server.url("/api/v1/profiles/nobody/follow"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let (status, _) = server
        .get_json("/api/v1/profiles/nobody/followers", None)
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_follow_requires_profile() {
    let server = TestServer::new().await;
    server.register("bob").await;

    let response = server
        .client
        .post(server.url("/api/v1/profiles/bob/follow"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let token = server.create_session("acct_unregistered").await;
    let response = server
        .client
        .post(server.url("/api/v1/profiles/bob/follow"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}
