use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/movies", movie_routes())
        .nest("/scores", score_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn movie_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::movie::list_movies,
            handlers::movie::create_movie
        ))
        .routes(routes!(
            handlers::movie::get_movie,
            handlers::movie::update_movie,
            handlers::movie::delete_movie
        ))
}

fn score_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::score::save_score))
}
