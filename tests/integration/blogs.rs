use serde_json::json;

use crate::common::{routes, TestApp};

mod creation {
    use super::*;

    #[tokio::test]
    async fn new_blog_starts_with_zero_counters() {
        let app = TestApp::spawn().await;
        let (author, token) = app.create_authenticated_user("u").await;

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "Hello", "body": "World", "tags": ["Intro", "intro", "rust"]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let blog = &res.body["blog"];
        assert_eq!(blog["title"], "Hello");
        assert_eq!(blog["author"]["id"], author);
        assert_eq!(blog["tags"], json!(["intro", "rust"]));
        for counter in ["likes_count", "comments_count", "favourite_count", "view_count"] {
            assert_eq!(blog[counter], 0, "{counter} should start at zero");
        }
    }

    #[tokio::test]
    async fn six_tags_are_rejected_and_nothing_is_stored() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("u").await;

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "Hello", "body": "World", "tags": ["a", "b", "c", "d", "e", "f"]}),
                &token,
            )
            .await;
        assert_eq!(res.status, 422);

        let mine = app.get_with_token(routes::MY_BLOGS, &token).await;
        assert_eq!(mine.body["blogsCount"], 0);
        let tags = app.get_without_token(routes::TAGS).await;
        assert_eq!(tags.body["tags"], json!([]));
    }

    #[tokio::test]
    async fn creating_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::BLOGS, &json!({"title": "Hello", "body": "World"}))
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn blog_can_be_filed_under_an_existing_category() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("u").await;
        let category = app
            .post_with_token(routes::CATEGORIES, &json!({"name": "News"}), &token)
            .await;
        let category_id = category.body["category"]["id"].as_i64().unwrap();

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "Hello", "body": "World", "category_id": category_id}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["blog"]["category"]["name"], "News");

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({"title": "Lost", "body": "World", "category_id": 999}),
                &token,
            )
            .await;
        assert_eq!(res.status, 404);
    }
}

mod reading {
    use super::*;

    #[tokio::test]
    async fn each_fetch_counts_a_view_and_refreshes_history() {
        let app = TestApp::spawn().await;
        let (_, author) = app.create_authenticated_user("u").await;
        let (_, reader) = app.create_authenticated_user("v").await;
        let blog = app.create_blog(&author, "Hello", &[]).await;

        let first = app.get_with_token(&routes::blog(blog), &reader).await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["blog"]["view_count"], 1);
        let second = app.get_with_token(&routes::blog(blog), &reader).await;
        assert_eq!(second.body["blog"]["view_count"], 2);

        let history = app.get_with_token(routes::MY_HISTORY, &reader).await;
        let entries = history.body["history"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["blog_id"], blog);
        assert_eq!(entries[0]["blog_title"], "Hello");
    }

    #[tokio::test]
    async fn missing_blog_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("u").await;

        let res = app.get_with_token(&routes::blog(42), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Blog not found");
    }

    #[tokio::test]
    async fn search_filters_and_marks_the_viewers_likes() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("u").await;
        let rust = app.create_blog(&token, "Rust ownership", &["rust"]).await;
        app.create_blog(&token, "Go channels", &["go"]).await;
        app.post_with_token(&routes::like(rust), &json!({}), &token).await;

        let all = app.get_without_token(routes::BLOGS).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.body["blogsCount"], 2);
        // newest first
        assert_eq!(all.body["blogs"][0]["title"], "Go channels");

        let tagged = app.get_with_token("/blogs?tag=rust", &token).await;
        assert_eq!(tagged.body["blogsCount"], 1);
        assert_eq!(tagged.body["blogs"][0]["liked"], true);

        let anonymous = app.get_without_token("/blogs?q=ownership").await;
        assert_eq!(anonymous.body["blogsCount"], 1);
        assert_eq!(anonymous.body["blogs"][0]["liked"], false);

        let paged = app.get_without_token("/blogs?limit=1&skip=1").await;
        assert_eq!(paged.body["blogsCount"], 1);
        assert_eq!(paged.body["blogs"][0]["title"], "Rust ownership");
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn non_author_cannot_update_and_blog_is_unchanged() {
        let app = TestApp::spawn().await;
        let (_, author) = app.create_authenticated_user("u").await;
        let (_, other) = app.create_authenticated_user("v").await;
        let blog = app.create_blog(&author, "Hello", &["intro"]).await;

        let res = app
            .put_with_token(&routes::blog(blog), &json!({"title": "Hijacked"}), &other)
            .await;
        assert_eq!(res.status, 403);

        let res = app.get_with_token(&routes::blog(blog), &author).await;
        assert_eq!(res.body["blog"]["title"], "Hello");
        assert_eq!(res.body["blog"]["tags"], json!(["intro"]));
    }

    #[tokio::test]
    async fn author_updates_title_and_tags() {
        let app = TestApp::spawn().await;
        let (_, author) = app.create_authenticated_user("u").await;
        let blog = app.create_blog(&author, "Hello", &["intro"]).await;

        let res = app
            .put_with_token(
                &routes::blog(blog),
                &json!({"title": "Hello again", "tags": ["Rust"]}),
                &author,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["blog"]["title"], "Hello again");
        assert_eq!(res.body["blog"]["body"], "Some words.");
        assert_eq!(res.body["blog"]["tags"], json!(["rust"]));
    }

    #[tokio::test]
    async fn missing_blog_is_reported_before_ownership() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("u").await;

        let res = app.put_with_token(&routes::blog(42), &json!({"title": "x"}), &token).await;
        assert_eq!(res.status, 404);
        let res = app.delete_with_token(&routes::blog(42), &token).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_blog_takes_its_dependents_along() {
        let app = TestApp::spawn().await;
        let (_, author) = app.create_authenticated_user("u").await;
        let (_, reader) = app.create_authenticated_user("v").await;
        let blog = app.create_blog(&author, "Hello", &["intro", "rust"]).await;
        let mut comments = vec![];
        for (body, token) in [("hi", &reader), ("hello", &reader), ("thanks", &author)] {
            let res = app
                .post_with_token(&routes::blog_comments(blog), &json!({"body": body}), token)
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
            comments.push(res.body["comment"]["id"].as_i64().unwrap());
        }
        app.post_with_token(&routes::like(blog), &json!({}), &reader).await;
        app.post_with_token(&routes::like(blog), &json!({}), &author).await;
        app.post_with_token(&routes::favourite(blog), &json!({}), &reader).await;
        app.get_with_token(&routes::blog(blog), &reader).await;
        assert_eq!(app.blog_counters(blog).await, (2, 3, 1, 1));

        let res = app.delete_with_token(&routes::blog(blog), &reader).await;
        assert_eq!(res.status, 403);
        let res = app.delete_with_token(&routes::blog(blog), &author).await;
        assert_eq!(res.status, 200, "{}", res.text);

        assert!(!app.blog_exists(blog).await);
        for table in ["comments", "likes", "favourites", "history", "blog_tags"] {
            assert_eq!(app.rows_for_blog(table, blog).await, 0, "{table} kept rows");
        }
        let tags = app.get_without_token(routes::TAGS).await;
        assert_eq!(tags.body["tags"].as_array().unwrap().len(), 2);

        for comment in comments {
            let res = app.get_with_token(&routes::comment(comment), &reader).await;
            assert_eq!(res.status, 404);
        }
        assert_eq!(app.get_with_token(&routes::blog_likes(blog), &reader).await.status, 404);
        let likes = app.get_with_token(routes::MY_LIKES, &reader).await;
        assert_eq!(likes.body["likes"], json!([]));
        let favourites = app.get_with_token(routes::MY_FAVOURITES, &reader).await;
        assert_eq!(favourites.body["favourites"], json!([]));
        let history = app.get_with_token(routes::MY_HISTORY, &reader).await;
        assert_eq!(history.body["history"], json!([]));
    }
}
