use super::validate_recipe;
use crate::api::{AppJson, ErrorResponse};
use crate::db::with_conn;
use crate::error::AppError;
use crate::models::NewRecipe;
use crate::store;
use crate::types::RecipePayload;
use crate::AppState;
use axum::{extract::State, http::StatusCode};

pub const UPDATED_MESSAGE: &str = "Recipe updated successfully";

/// Replaces a recipe's name and description. `Ingredients` in the body are
/// ignored.
#[utoipa::path(
    put,
    path = "/recipes",
    tag = "recipes",
    request_body = RecipePayload,
    responses(
        (status = 200, description = "Recipe updated successfully", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(pool): State<AppState>,
    AppJson(payload): AppJson<RecipePayload>,
) -> Result<(StatusCode, &'static str), AppError> {
    let Some(id) = payload.id else {
        return Err(AppError::Validation("Id is required".to_string()));
    };
    validate_recipe(&payload)?;

    let updated = with_conn(&pool, move |conn| {
        let changes = NewRecipe {
            recipe_name: &payload.name,
            description: &payload.description,
        };
        store::update_recipe(conn, id, &changes)
    })
    .await?;

    if updated == 0 {
        return Err(AppError::NotFound(format!("No recipe found for Id {}", id)));
    }

    Ok((StatusCode::OK, UPDATED_MESSAGE))
}
