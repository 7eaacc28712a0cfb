use inkpost::config::AuthConfig;
use inkpost::TokenService;
use serde_json::json;

use crate::common::{routes, TestApp, JWT_SECRET};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_receives_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "alice",
                    "email": "alice@example.com",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user"]["username"], "alice");
        assert!(res.body["user"]["token"].is_string());
        assert!(res.body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_register_a_taken_username() {
        let app = TestApp::spawn().await;
        let body = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "securepass",
        });

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.error(), "Username already taken");
    }

    #[tokio::test]
    async fn cannot_register_with_a_bad_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "nope", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 422);
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": "alice", "password": "wrong"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Invalid username or password");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": "ghost", "password": "x"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Invalid username or password");
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn token_resolves_to_the_current_user() {
        let app = TestApp::spawn().await;
        let (id, token) = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["id"], id);
        assert_eq!(res.body["user"]["username"], "alice");
    }

    #[tokio::test]
    async fn missing_or_malformed_credentials_are_unauthenticated() {
        let app = TestApp::spawn().await;

        assert_eq!(app.get_without_token(routes::ME).await.status, 401);
        assert_eq!(app.get_with_token(routes::ME, "garbage").await.status, 401);
        assert_eq!(app.get_with_header(routes::ME, "Token abc").await.status, 401);
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let app = TestApp::spawn().await;
        let (id, _) = app.create_authenticated_user("alice").await;
        let stale = TokenService::new(&AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_minutes: -10,
        })
        .issue(id)
        .unwrap();

        let res = app.get_with_token(routes::ME, &stale).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Token expired");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let app = TestApp::spawn().await;
        let (id, _) = app.create_authenticated_user("alice").await;
        let forged = TokenService::new(&AuthConfig {
            jwt_secret: "someone-else".to_string(),
            token_ttl_minutes: 30,
        })
        .issue(id)
        .unwrap();

        assert_eq!(app.get_with_token(routes::ME, &forged).await.status, 401);
    }

    #[tokio::test]
    async fn deactivated_account_loses_access() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice").await;

        let res = app.post_with_token(routes::DEACTIVATE, &json!({}), &token).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::ME, &token).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Account disabled");

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;
        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn deleted_account_token_stops_working() {
        let app = TestApp::spawn().await;
        let (id, token) = app.create_authenticated_user("alice").await;

        let res = app.delete_with_token(&routes::user(id), &token).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::ME, &token).await;
        assert_eq!(res.status, 401);
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn users_may_only_edit_themselves() {
        let app = TestApp::spawn().await;
        let (alice, alice_token) = app.create_authenticated_user("alice").await;
        let (bob, _) = app.create_authenticated_user("bob").await;

        let res = app
            .put_with_token(&routes::user(bob), &json!({"location": "Paris"}), &alice_token)
            .await;
        assert_eq!(res.status, 403);

        let res = app
            .put_with_token(&routes::user(alice), &json!({"location": "Lagos"}), &alice_token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["location"], "Lagos");

        let res = app.put_with_token(&routes::user(999), &json!({}), &alice_token).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn changed_password_is_used_for_login() {
        let app = TestApp::spawn().await;
        let (alice, token) = app.create_authenticated_user("alice").await;

        let res = app
            .put_with_token(&routes::user(alice), &json!({"password": "newsecret"}), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let old = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;
        assert_eq!(old.status, 401);
        let new = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "newsecret"}),
            )
            .await;
        assert_eq!(new.status, 200);
    }
}
