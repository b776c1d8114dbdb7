use crate::api::{AppPath, ErrorResponse};
use crate::db::with_conn;
use crate::error::AppError;
use crate::api::recipes::recipe_id;
use crate::store;
use crate::AppState;
use axum::{extract::State, http::StatusCode};

pub const DELETED_MESSAGE: &str = "Recipe deleted successfully";

/// Deletes a recipe along with its ingredients.
#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted successfully", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid recipe id", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(pool): State<AppState>,
    AppPath(raw_id): AppPath<i64>,
) -> Result<(StatusCode, &'static str), AppError> {
    let id = recipe_id(raw_id)?;
    let deleted = with_conn(&pool, move |conn| store::delete_recipe(conn, id)).await?;

    if !deleted {
        return Err(AppError::NotFound(format!("No recipe found for Id {}", id)));
    }

    tracing::info!(recipe_id = id, "recipe deleted");
    Ok((StatusCode::OK, DELETED_MESSAGE))
}
