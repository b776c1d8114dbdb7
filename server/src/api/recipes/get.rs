use crate::api::{AppPath, ErrorResponse};
use crate::db::with_conn;
use crate::error::AppError;
use crate::api::recipes::recipe_id;
use crate::store;
use crate::types::RecipeDetails;
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with its ingredients", body = RecipeDetails),
        (status = 400, description = "Invalid recipe id", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(pool): State<AppState>,
    AppPath(raw_id): AppPath<i64>,
) -> Result<Json<RecipeDetails>, AppError> {
    let id = recipe_id(raw_id)?;
    let found = with_conn(&pool, move |conn| store::fetch_recipe(conn, id)).await?;

    match found {
        Some(recipe) => Ok(Json(recipe.into())),
        None => Err(AppError::NotFound(
            "No recipe found for given Id".to_string(),
        )),
    }
}
