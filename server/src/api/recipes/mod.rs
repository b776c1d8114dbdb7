pub mod create;
pub mod delete;
pub mod get;
pub mod update;

use crate::error::AppError;
use crate::types::{IngredientPayload, RecipePayload};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

// Column widths from the recipe/ingredient schema
pub const MAX_RECIPE_NAME_LEN: usize = 100;
pub const MAX_INGREDIENT_NAME_LEN: usize = 20;
pub const MAX_UNIT_LEN: usize = 10;

/// Returns the router for /recipes endpoints (mounted at /recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create::create_recipe).put(update::update_recipe))
        .route("/{id}", get(get::get_recipe).delete(delete::delete_recipe))
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Any integer is a well-formed id. Ids the `serial` column can never
/// hold name no recipe, so they are a miss rather than bad input.
pub fn recipe_id(raw: i64) -> Result<i32, AppError> {
    i32::try_from(raw)
        .map_err(|_| AppError::NotFound(format!("No recipe found for Id {}", raw)))
}

pub fn validate_recipe(payload: &RecipePayload) -> Result<(), AppError> {
    check_len("Name", &payload.name, MAX_RECIPE_NAME_LEN)
}

pub fn validate_ingredients(ingredients: &[IngredientPayload]) -> Result<(), AppError> {
    for ingredient in ingredients {
        check_len("Ingredient name", &ingredient.name, MAX_INGREDIENT_NAME_LEN)?;
        check_len("Ingredient unit", &ingredient.unit, MAX_UNIT_LEN)?;
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        crate::types::RecipePayload,
        crate::types::IngredientPayload,
        crate::types::RecipeDetails,
        crate::types::RecipeSummary,
        crate::types::IngredientResponse,
        create::CreateRecipeResponse,
    ))
)]
pub struct ApiDoc;
