//! Recipe persistence: the four operations behind the HTTP handlers.
//!
//! Every function takes a checked-out connection and returns diesel's
//! `QueryResult`; mapping to HTTP errors happens at the request boundary.
//! Each statement runs under a `db.query` span so per-request query counts
//! show up in telemetry.

use crate::models::{Ingredient, IngredientInput, NewIngredient, NewRecipe, Recipe};
use crate::schema::{ingredient, recipe};
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeWithIngredients {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}

fn traced<T>(statement: &'static str, run: impl FnOnce() -> QueryResult<T>) -> QueryResult<T> {
    let _span = tracing::info_span!("db.query", statement).entered();
    run()
}

/// Loads a recipe and its ingredients. `Ok(None)` when no recipe has `id`.
pub fn fetch_recipe(
    conn: &mut PgConnection,
    id: i32,
) -> QueryResult<Option<RecipeWithIngredients>> {
    let found = traced("select recipe", || {
        recipe::table
            .find(id)
            .select(Recipe::as_select())
            .first(conn)
            .optional()
    })?;

    let Some(recipe) = found else {
        return Ok(None);
    };

    let ingredients = traced("select ingredients", || {
        ingredient::table
            .filter(ingredient::recipe_id.eq(id))
            .order(ingredient::id.asc())
            .select(Ingredient::as_select())
            .load(conn)
    })?;

    Ok(Some(RecipeWithIngredients {
        recipe,
        ingredients,
    }))
}

/// Inserts a recipe and all of its ingredients atomically, returning the new
/// recipe id. Any failing statement rolls back the whole creation.
pub fn insert_recipe(
    conn: &mut PgConnection,
    new_recipe: &NewRecipe<'_>,
    ingredients: &[IngredientInput<'_>],
) -> QueryResult<i32> {
    conn.transaction(|conn| {
        let recipe_id: i32 = traced("insert recipe", || {
            diesel::insert_into(recipe::table)
                .values(new_recipe)
                .returning(recipe::id)
                .get_result(conn)
        })?;

        if !ingredients.is_empty() {
            let rows: Vec<NewIngredient<'_>> = ingredients
                .iter()
                .map(|i| NewIngredient {
                    recipe_id,
                    ingredient_name: i.name,
                    quantity: i.quantity,
                    unit: i.unit,
                })
                .collect();

            traced("insert ingredients", || {
                diesel::insert_into(ingredient::table)
                    .values(&rows)
                    .execute(conn)
            })?;
        }

        Ok(recipe_id)
    })
}

/// Sets name and description on recipe `id`. Returns the number of rows
/// changed (0 when the recipe doesn't exist). Ingredients are untouched.
pub fn update_recipe(
    conn: &mut PgConnection,
    id: i32,
    changes: &NewRecipe<'_>,
) -> QueryResult<usize> {
    traced("update recipe", || {
        diesel::update(recipe::table.find(id))
            .set(changes)
            .execute(conn)
    })
}

/// Deletes recipe `id` together with its ingredients. Returns `false` when
/// there was no such recipe.
pub fn delete_recipe(conn: &mut PgConnection, id: i32) -> QueryResult<bool> {
    conn.transaction(|conn| {
        traced("delete ingredients", || {
            diesel::delete(ingredient::table.filter(ingredient::recipe_id.eq(id))).execute(conn)
        })?;

        let deleted = traced("delete recipe", || {
            diesel::delete(recipe::table.find(id)).execute(conn)
        })?;

        Ok(deleted > 0)
    })
}
