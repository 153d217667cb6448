use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::entity::role::ROLE_ADMIN;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::movie::*;
use crate::models::shared::page_params;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Movies",
    operation_id = "listMovies",
    summary = "List movies with pagination and title search",
    description = "Returns a page of movies ordered by ID. `title` filters by case-insensitive substring. Public.",
    params(MovieListQuery),
    responses(
        (status = 200, description = "Page of movies", body = MovieListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<Json<MovieListResponse>, AppError> {
    let (page, per_page) = page_params(query.page, query.per_page, 10);
    let title = query.title.as_deref().unwrap_or("");

    let result = state.movies.find_all(title, page, per_page).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Movies",
    operation_id = "getMovie",
    summary = "Get a movie by ID",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie details", body = MovieResponse),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MovieResponse>, AppError> {
    Ok(Json(state.movies.find_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Movies",
    operation_id = "createMovie",
    summary = "Create a movie",
    description = "Creates an unrated movie. Requires `ROLE_ADMIN`.",
    request_body = MovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<MovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(ROLE_ADMIN)?;

    let movie = state.movies.insert(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Movies",
    operation_id = "updateMovie",
    summary = "Replace a movie's title and image",
    description = "Replaces the editable fields of a movie. Score and count are unaffected. Requires `ROLE_ADMIN`.",
    params(("id" = i32, Path, description = "Movie ID")),
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<MovieRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    auth_user.require_role(ROLE_ADMIN)?;

    Ok(Json(state.movies.update(id, payload.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Movies",
    operation_id = "deleteMovie",
    summary = "Delete a movie",
    description = "Deletes a movie. Requires `ROLE_ADMIN`. Returns 409 CONFLICT while users' scores reference the movie.",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Movie has scores (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_role(ROLE_ADMIN)?;

    state.movies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
