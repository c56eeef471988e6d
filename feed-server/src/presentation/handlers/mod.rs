pub mod aggregate;
pub mod comment;
pub mod post;
pub mod profile;

use actix_web::web;

use crate::data::store::FeedStore;

/// Feed and profile routes, relative to the `/api` scope. Fixed segments are registered
/// ahead of `/posts/{id}`.
pub fn configure<S: FeedStore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(post::list_posts::<S>))
            .route(web::post().to(post::create_post::<S>)),
    )
    .service(web::resource("/posts/categories").route(web::get().to(aggregate::categories::<S>)))
    .service(
        web::resource("/posts/tags/popular").route(web::get().to(aggregate::popular_tags::<S>)),
    )
    .service(web::resource("/posts/{id}").route(web::get().to(post::get_post::<S>)))
    .service(web::resource("/posts/{id}/like").route(web::post().to(post::like_post::<S>)))
    .service(
        web::resource("/posts/{id}/comments")
            .route(web::get().to(comment::list_comments::<S>))
            .route(web::post().to(comment::add_comment::<S>)),
    )
    .service(
        web::resource("/profiles/{user_id}")
            .route(web::get().to(profile::get_user_profile::<S>)),
    )
    .service(
        web::resource("/profile")
            .route(web::get().to(profile::get_own_profile::<S>))
            .route(web::put().to(profile::update_own_profile::<S>)),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use super::configure;
    use crate::application::aggregate_cache::AggregateCache;
    use crate::application::aggregate_service::AggregateService;
    use crate::application::feed_service::FeedService;
    use crate::application::profile_service::ProfileService;
    use crate::data::in_memory::{InMemoryStore, sample_post};
    use crate::domain::author::ProfileSummary;
    use crate::domain::post::Post;
    use crate::infrastructure::security::test_support::{TEST_SECRET, token_for};
    use crate::infrastructure::security::{JwtKeys, Subject};
    use crate::presentation::middleware::{REQUEST_ID_HEADER, RequestTracing};

    macro_rules! feed_app {
        ($store:expr) => {{
            let store: Arc<InMemoryStore> = $store;
            let cache = Arc::new(AggregateCache::default());
            let feed = FeedService::new(Arc::clone(&store), Arc::clone(&cache), false);
            let aggregates = AggregateService::new(Arc::clone(&store), cache);
            let profiles = ProfileService::new(Arc::clone(&store));
            test::init_service(
                App::new()
                    .wrap(RequestTracing)
                    .app_data(web::Data::new(feed))
                    .app_data(web::Data::new(aggregates))
                    .app_data(web::Data::new(profiles))
                    .app_data(web::Data::new(JwtKeys::new(TEST_SECRET)))
                    .service(web::scope("/api").configure(configure::<InMemoryStore>)),
            )
            .await
        }};
    }

    fn bearer(user_id: i64) -> (actix_web::http::header::HeaderName, String) {
        let token = token_for(Subject::Text(user_id.to_string()), TEST_SECRET);
        (AUTHORIZATION, format!("Bearer {token}"))
    }

    fn in_category(id: i64, category: &str) -> Post {
        Post {
            category: Some(category.to_string()),
            ..sample_post(id, 1)
        }
    }

    #[actix_web::test]
    async fn lists_a_filtered_page_with_total() {
        let mut posts: Vec<Post> = (1..=12).map(|id| in_category(id, "eng")).collect();
        posts.extend((13..=15).map(|id| in_category(id, "design")));
        let app = feed_app!(Arc::new(InMemoryStore::with_posts(posts)));

        let req = test::TestRequest::get()
            .uri("/api/posts?category=eng&page=2&per_page=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<i64> = body["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
        assert_eq!(body["total"], json!(12));
        assert_eq!(body["page"], json!(2));
        assert_eq!(body["per_page"], json!(5));
    }

    #[actix_web::test]
    async fn bracketed_tag_params_filter_the_feed() {
        let app = feed_app!(Arc::new(InMemoryStore::with_posts(vec![
            Post {
                tags: Some("rust,async".into()),
                ..sample_post(1, 1)
            },
            Post {
                tags: Some("go".into()),
                ..sample_post(2, 1)
            },
        ])));

        let req = test::TestRequest::get()
            .uri("/api/posts?tags%5B%5D=rust&tags%5B%5D=async")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], json!(1));
        assert_eq!(body["posts"][0]["tags"], json!(["rust", "async"]));
    }

    #[actix_web::test]
    async fn aggregate_routes_are_not_taken_for_post_ids() {
        let app = feed_app!(Arc::new(InMemoryStore::with_posts(vec![
            Post {
                tags: Some("go".into()),
                ..in_category(1, "eng")
            },
            in_category(2, "design"),
        ])));

        let req = test::TestRequest::get().uri("/api/posts/categories").to_request();
        let categories: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(categories, json!(["design", "eng"]));

        let req = test::TestRequest::get()
            .uri("/api/posts/tags/popular?limit=5")
            .to_request();
        let tags: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tags, json!(["go"]));
    }

    #[actix_web::test]
    async fn single_post_carries_author_profile() {
        let store = Arc::new(InMemoryStore::with_posts(vec![sample_post(1, 4)]));
        store.add_author(
            4,
            "Grace",
            Some(ProfileSummary {
                image: Some("/uploads/grace.png".into()),
                job_title: None,
            }),
        );
        let app = feed_app!(store);

        let req = test::TestRequest::get().uri("/api/posts/1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body["user"],
            json!({ "id": 4, "name": "Grace", "avatar": "/uploads/grace.png", "job_title": null })
        );
        assert_eq!(body["comments"], json!([]));
    }

    #[actix_web::test]
    async fn unknown_post_is_not_found() {
        let app = feed_app!(Arc::new(InMemoryStore::new()));

        let req = test::TestRequest::get().uri("/api/posts/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"]["resource"], json!(42));
    }

    #[actix_web::test]
    async fn writes_require_a_bearer_token() {
        let app = feed_app!(Arc::new(InMemoryStore::with_posts(vec![sample_post(1, 1)])));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "content": "hello" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let forged = token_for(Subject::Number(1), "not-the-secret");
        let req = test::TestRequest::post()
            .uri("/api/posts/1/like")
            .insert_header((AUTHORIZATION, format!("Bearer {forged}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn creates_a_post_for_the_token_subject() {
        let store = Arc::new(InMemoryStore::new());
        store.add_author(3, "Ada", None);
        let app = feed_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(3))
            .set_json(json!({
                "content": "shipping today",
                "tags": [" rust ", "", "release"],
                "category": "eng"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["id"], json!(3));
        assert_eq!(body["user"]["name"], json!("Ada"));
        assert_eq!(body["tags"], json!(["rust", "release"]));
        assert_eq!(body["visibility"], json!("public"));
        assert_eq!(body["likes"], json!(0));
    }

    #[actix_web::test]
    async fn blank_content_is_rejected() {
        let app = feed_app!(Arc::new(InMemoryStore::new()));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(1))
            .set_json(json!({ "content": "   " }))
            .to_request();

        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn likes_accumulate() {
        let app = feed_app!(Arc::new(InMemoryStore::with_posts(vec![sample_post(1, 1)])));

        for expected in 1..=2 {
            let req = test::TestRequest::post()
                .uri("/api/posts/1/like")
                .insert_header(bearer(2))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body, json!({ "likes": expected }));
        }

        let req = test::TestRequest::post()
            .uri("/api/posts/9/like")
            .insert_header(bearer(2))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn comments_round_trip_through_the_api() {
        let store = Arc::new(InMemoryStore::with_posts(vec![sample_post(1, 1)]));
        store.add_author(2, "Linus", None);
        let app = feed_app!(store);

        for text in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri("/api/posts/1/comments")
                .insert_header(bearer(2))
                .set_json(json!({ "content": text }))
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::CREATED
            );
        }

        let req = test::TestRequest::get().uri("/api/posts/1/comments").to_request();
        let comments: Value = test::call_and_read_body_json(&app, req).await;
        let contents: Vec<&str> = comments
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(comments[0]["user_name"], json!("Linus"));

        let req = test::TestRequest::get().uri("/api/posts/1").to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["comments"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn store_outage_degrades_aggregates_only() {
        let store = Arc::new(InMemoryStore::with_posts(vec![in_category(1, "eng")]));
        store.set_unavailable(true);
        let app = feed_app!(Arc::clone(&store));

        let req = test::TestRequest::get().uri("/api/posts/categories").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"]["retryable"], json!(true));
    }

    #[actix_web::test]
    async fn request_id_is_echoed() {
        let app = feed_app!(Arc::new(InMemoryStore::new()));

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header((REQUEST_ID_HEADER.clone(), "req-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(&REQUEST_ID_HEADER).unwrap(),
            "req-123"
        );
        assert!(resp.headers().contains_key("server-timing"));
    }
    #[actix_web::test]
    async fn public_profile_is_readable_without_a_token() {
        let store = Arc::new(InMemoryStore::new());
        store.add_author(
            4,
            "Grace",
            Some(ProfileSummary {
                image: None,
                job_title: Some("Admiral".into()),
            }),
        );
        store.add_author(5, "Linus", None);
        let app = feed_app!(store);

        let req = test::TestRequest::get().uri("/api/profiles/4").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user_id"], json!(4));
        assert_eq!(body["job_title"], json!("Admiral"));
        assert_eq!(body["user"], json!({ "id": 4, "name": "Grace" }));
        for field in ["first_name", "last_name", "skills", "experience", "education", "image", "company", "social_links"] {
            assert!(body.get(field).is_some(), "missing {field}");
        }

        let req = test::TestRequest::get().uri("/api/profiles/5").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
        let req = test::TestRequest::get().uri("/api/profiles/6").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn own_profile_requires_a_token_and_is_created_on_read() {
        let store = Arc::new(InMemoryStore::new());
        store.add_author(2, "Linus", None);
        let app = feed_app!(store);

        let req = test::TestRequest::get().uri("/api/profile").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(bearer(2))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["first_name"], json!("First"));
        assert_eq!(body["last_name"], json!("Last"));
    }

    #[actix_web::test]
    async fn profile_edits_are_partial_and_public() {
        let store = Arc::new(InMemoryStore::new());
        store.add_author(2, "Linus", None);
        let app = feed_app!(store);

        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(bearer(2))
            .set_json(json!({ "first_name": "Linus", "last_name": "T", "bio": "kernel" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(bearer(2))
            .set_json(json!({ "bio": null, "company": "OSDL" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["first_name"], json!("Linus"));
        assert_eq!(body["bio"], json!(null));
        assert_eq!(body["company"], json!("OSDL"));

        let req = test::TestRequest::get().uri("/api/profiles/2").to_request();
        let public: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(public, body);
    }

    #[actix_web::test]
    async fn profile_edit_cannot_blank_names() {
        let store = Arc::new(InMemoryStore::new());
        store.add_author(2, "Linus", None);
        let app = feed_app!(store);

        for payload in [json!({ "last_name": "" }), json!({})] {
            let req = test::TestRequest::put()
                .uri("/api/profile")
                .insert_header(bearer(2))
                .set_json(payload)
                .to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::BAD_REQUEST
            );
        }
    }
}
