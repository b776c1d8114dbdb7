use super::{validate_ingredients, validate_recipe};
use crate::api::{AppJson, ErrorResponse};
use crate::db::with_conn;
use crate::error::AppError;
use crate::models::{IngredientInput, NewRecipe};
use crate::store;
use crate::types::{IngredientPayload, RecipePayload};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

pub const CREATED_MESSAGE: &str = "Recipe successfully added";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRecipeResponse {
    pub id: i32,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Constraint violation", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(pool): State<AppState>,
    AppJson(payload): AppJson<RecipePayload>,
) -> Result<(StatusCode, Json<CreateRecipeResponse>), AppError> {
    validate_recipe(&payload)?;
    validate_ingredients(&payload.ingredients)?;

    let ingredient_count = payload.ingredients.len();
    let recipe_id = with_conn(&pool, move |conn| {
        let new_recipe = NewRecipe {
            recipe_name: &payload.name,
            description: &payload.description,
        };
        let ingredients: Vec<IngredientInput<'_>> = payload
            .ingredients
            .iter()
            .map(IngredientPayload::as_input)
            .collect();

        store::insert_recipe(conn, &new_recipe, &ingredients)
    })
    .await?;

    tracing::info!(recipe_id, ingredient_count, "recipe created");

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            id: recipe_id,
            message: CREATED_MESSAGE.to_string(),
        }),
    ))
}
