use serde_json::json;

use crate::common::{routes, test_config, TestApp};

async fn corrupt_likes(app: &TestApp, blog: i64, value: i64) {
    sqlx::query("UPDATE blogs SET likes_count = ? WHERE id = ?")
        .bind(value)
        .bind(blog)
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn author_reconcile_reports_and_repairs_drift() {
    let app = TestApp::spawn().await;
    let (_, author) = app.create_authenticated_user("u").await;
    let blog = app.create_blog(&author, "Hello", &[]).await;
    app.post_with_token(&routes::like(blog), &json!({}), &author).await;
    corrupt_likes(&app, blog, 7).await;

    let res = app.post_with_token(&routes::reconcile(blog), &json!({}), &author).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(
        res.body["corrections"],
        json!([{"counter": "likes_count", "cached": 7, "actual": 1}])
    );
    assert_eq!(res.body["blog"]["likes_count"], 1);
    assert_eq!(app.blog_counters(blog).await.0, 1);
}

#[tokio::test]
async fn reconcile_is_reserved_to_the_author() {
    let app = TestApp::spawn().await;
    let (_, author) = app.create_authenticated_user("u").await;
    let (_, other) = app.create_authenticated_user("v").await;
    let blog = app.create_blog(&author, "Hello", &[]).await;
    corrupt_likes(&app, blog, 3).await;

    let res = app.post_with_token(&routes::reconcile(blog), &json!({}), &other).await;

    assert_eq!(res.status, 403);
    assert_eq!(app.blog_counters(blog).await.0, 3);
}

#[tokio::test]
async fn consistent_blog_needs_no_corrections() {
    let app = TestApp::spawn().await;
    let (_, author) = app.create_authenticated_user("u").await;
    let blog = app.create_blog(&author, "Hello", &[]).await;

    let res = app.post_with_token(&routes::reconcile(blog), &json!({}), &author).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["corrections"], json!([]));
}

#[tokio::test]
async fn certain_reconciliation_repairs_drift_on_removal() {
    let app = TestApp::spawn_with(test_config(1.0)).await;
    let (_, author) = app.create_authenticated_user("u").await;
    let (_, reader) = app.create_authenticated_user("v").await;
    let blog = app.create_blog(&author, "Hello", &[]).await;
    app.post_with_token(&routes::like(blog), &json!({}), &author).await;
    app.post_with_token(&routes::like(blog), &json!({}), &reader).await;
    corrupt_likes(&app, blog, 10).await;

    let res = app.delete_with_token(&routes::like(blog), &reader).await;

    assert_eq!(res.status, 200);
    assert_eq!(app.blog_counters(blog).await.0, 1);
}

#[tokio::test]
async fn disabled_reconciliation_leaves_drift_alone() {
    let app = TestApp::spawn().await;
    let (_, author) = app.create_authenticated_user("u").await;
    let (_, reader) = app.create_authenticated_user("v").await;
    let blog = app.create_blog(&author, "Hello", &[]).await;
    app.post_with_token(&routes::like(blog), &json!({}), &author).await;
    app.post_with_token(&routes::like(blog), &json!({}), &reader).await;
    corrupt_likes(&app, blog, 10).await;

    app.delete_with_token(&routes::like(blog), &reader).await;

    assert_eq!(app.blog_counters(blog).await.0, 9);
}

#[tokio::test]
async fn deleting_a_user_repairs_counters_of_blogs_they_touched() {
    let app = TestApp::spawn().await;
    let (_, author) = app.create_authenticated_user("u").await;
    let (reader_id, reader) = app.create_authenticated_user("v").await;
    let blog = app.create_blog(&author, "Hello", &[]).await;
    app.post_with_token(&routes::like(blog), &json!({}), &reader).await;
    app.post_with_token(&routes::favourite(blog), &json!({}), &reader).await;
    app.post_with_token(&routes::blog_comments(blog), &json!({"body": "hi"}), &reader)
        .await;
    app.get_with_token(&routes::blog(blog), &reader).await;

    let res = app.delete_with_token(&routes::user(reader_id), &reader).await;
    assert_eq!(res.status, 200, "{}", res.text);

    // views are a running total and survive the viewer
    assert_eq!(app.blog_counters(blog).await, (0, 0, 0, 1));
}
