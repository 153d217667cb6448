use serde_json::json;

use crate::common::{TestApp, routes};

const IMAGE: &str = "https://img.example.com/poster.jpg";

mod catalog {
    use super::*;

    #[tokio::test]
    async fn anyone_can_list_movies_ordered_by_id() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        let first = app.create_movie(&admin, "The Witcher").await;
        let second = app.create_movie(&admin, "Venom: Tempo de Carnificina").await;

        let res = app.get_without_token(routes::MOVIES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"][0]["id"], first);
        assert_eq!(res.body["data"][1]["id"], second);
        assert_eq!(res.body["pagination"]["total"], 2);
        assert_eq!(res.body["pagination"]["per_page"], 10);
    }

    #[tokio::test]
    async fn title_filter_is_case_insensitive() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        app.create_movie(&admin, "The Witcher").await;
        let venom = app.create_movie(&admin, "Venom: Tempo de Carnificina").await;

        let res = app
            .get_without_token(&format!("{}?title=VENOM", routes::MOVIES))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["data"][0]["id"], venom);
    }

    #[tokio::test]
    async fn like_wildcards_in_title_filter_match_literally() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        app.create_movie(&admin, "The Witcher").await;

        let res = app
            .get_without_token(&format!("{}?title=%25", routes::MOVIES))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn pages_through_results() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        app.create_movie(&admin, "Movie One").await;
        let second = app.create_movie(&admin, "Movie Two").await;
        app.create_movie(&admin, "Movie Three").await;

        let res = app
            .get_without_token(&format!("{}?page=2&per_page=1", routes::MOVIES))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"][0]["id"], second);
        assert_eq!(res.body["pagination"]["total_pages"], 3);
    }

    #[tokio::test]
    async fn new_movie_is_unrated() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        let id = app.create_movie(&admin, "The Witcher").await;

        let res = app.get_without_token(&routes::movie(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "The Witcher");
        assert_eq!(res.body["count"], 0);
        assert_eq!(res.body["score"], 0.0);
    }

    #[tokio::test]
    async fn unknown_movie_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::movie(1000)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod administration {
    use super::*;

    #[tokio::test]
    async fn client_cannot_create_movies() {
        let app = TestApp::spawn().await;
        let client = app.create_client("maria@gmail.com").await;

        let res = app
            .post_with_token(
                routes::MOVIES,
                &json!({"title": "The Witcher", "image": IMAGE}),
                &client,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn anonymous_user_cannot_create_movies() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::MOVIES,
                &json!({"title": "The Witcher", "image": IMAGE}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn short_title_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;

        let res = app
            .post_with_token(routes::MOVIES, &json!({"title": "Up", "image": IMAGE}), &admin)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn update_replaces_title_and_keeps_score() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        let id = app.create_movie(&admin, "The Witcher").await;
        app.score_movie(&admin, id, 4.0).await;

        let res = app
            .put_with_token(
                &routes::movie(id),
                &json!({"title": "The Witcher: Blood Origin", "image": IMAGE}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "The Witcher: Blood Origin");
        assert_eq!(res.body["count"], 1);
        assert_eq!(res.body["score"], 4.0);
    }

    #[tokio::test]
    async fn update_of_unknown_movie_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;

        let res = app
            .put_with_token(
                &routes::movie(1000),
                &json!({"title": "The Witcher", "image": IMAGE}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn unrated_movie_can_be_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        let id = app.create_movie(&admin, "The Witcher").await;

        let res = app.delete_with_token(&routes::movie(id), &admin).await;
        assert_eq!(res.status, 204);

        let res = app.get_without_token(&routes::movie(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn scored_movie_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        let id = app.create_movie(&admin, "The Witcher").await;
        app.score_movie(&admin, id, 3.0).await;

        let res = app.delete_with_token(&routes::movie(id), &admin).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;
        let id = app.create_movie(&admin, "The Witcher").await;

        let first = app.delete_with_token(&routes::movie(id), &admin).await;
        let second = app.delete_with_token(&routes::movie(id), &admin).await;

        assert_eq!(first.status, 204);
        assert_eq!(second.status, 404);
    }

    #[tokio::test]
    async fn delete_of_unknown_movie_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@gmail.com").await;

        let res = app.delete_with_token(&routes::movie(1000), &admin).await;

        assert_eq!(res.status, 404);
    }
}
