use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::entity::role::{ROLE_ADMIN, ROLE_CLIENT};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::movie::MovieResponse;
use crate::models::score::ScoreRequest;
use crate::state::AppState;

#[utoipa::path(
    put,
    path = "/",
    tag = "Scores",
    operation_id = "saveScore",
    summary = "Score a movie",
    description = "Saves the caller's score for a movie, replacing any earlier score by the same user, and returns the movie with its updated average. Requires `ROLE_CLIENT` or `ROLE_ADMIN`.",
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Score saved", body = MovieResponse),
        (status = 400, description = "Score out of range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, movie_id = payload.movie_id))]
pub async fn save_score(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ScoreRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    auth_user.require_any_role(&[ROLE_CLIENT, ROLE_ADMIN])?;

    let user = state
        .users
        .authenticated(Some(auth_user.username.as_str()))
        .await?;
    let movie = state.scores.save_score(user.id, payload).await?;

    Ok(Json(movie))
}
