use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::recipe)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub recipe_name: String,
    pub description: String,
}

/// Insert and update share the same columns: name and description.
#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = crate::schema::recipe)]
pub struct NewRecipe<'a> {
    pub recipe_name: &'a str,
    pub description: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::ingredient)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: i32,
    pub ingredient_name: String,
    pub quantity: i32,
    pub unit: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::ingredient)]
pub struct NewIngredient<'a> {
    pub recipe_id: i32,
    pub ingredient_name: &'a str,
    pub quantity: i32,
    pub unit: &'a str,
}

/// Ingredient fields supplied by a client, before the owning recipe id is known.
#[derive(Debug, Clone, Copy)]
pub struct IngredientInput<'a> {
    pub name: &'a str,
    pub quantity: i32,
    pub unit: &'a str,
}
