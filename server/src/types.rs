use crate::models::{Ingredient, IngredientInput, Recipe};
use crate::store::RecipeWithIngredients;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Recipe as sent by clients on create and update.
/// `Id` is ignored on create; on update it selects the recipe to change.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RecipePayload {
    #[serde(default, alias = "id")]
    pub id: Option<i32>,
    #[serde(alias = "name")]
    pub name: String,
    #[serde(alias = "description")]
    pub description: String,
    #[serde(default, alias = "ingredients")]
    pub ingredients: Vec<IngredientPayload>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct IngredientPayload {
    #[serde(alias = "name")]
    pub name: String,
    #[serde(alias = "quantity")]
    pub quantity: i32,
    #[serde(alias = "unit")]
    pub unit: String,
}

impl IngredientPayload {
    pub fn as_input(&self) -> IngredientInput<'_> {
        IngredientInput {
            name: &self.name,
            quantity: self.quantity,
            unit: &self.unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit: String,
}

/// A recipe paired with its ingredients, as returned by `GET /recipes/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeDetails {
    pub recipe: RecipeSummary,
    pub ingredients: Vec<IngredientResponse>,
}

impl From<Recipe> for RecipeSummary {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.recipe_name,
            description: recipe.description,
        }
    }
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.ingredient_name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
        }
    }
}

impl From<RecipeWithIngredients> for RecipeDetails {
    fn from(found: RecipeWithIngredients) -> Self {
        Self {
            recipe: found.recipe.into(),
            ingredients: found.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pascal_case_payload() {
        let payload: RecipePayload = serde_json::from_str(
            r#"{"Name":"Soup","Description":"Hot","Ingredients":[{"Name":"Salt","Quantity":1,"Unit":"tsp"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.name, "Soup");
        assert_eq!(payload.description, "Hot");
        assert_eq!(payload.ingredients.len(), 1);
        assert_eq!(payload.ingredients[0].name, "Salt");
        assert_eq!(payload.ingredients[0].quantity, 1);
        assert_eq!(payload.ingredients[0].unit, "tsp");
    }

    #[test]
    fn test_parse_lowercase_payload_without_ingredients() {
        let payload: RecipePayload =
            serde_json::from_str(r#"{"id":7,"name":"Stew","description":"Thick"}"#).unwrap();
        assert_eq!(payload.id, Some(7));
        assert_eq!(payload.name, "Stew");
        assert!(payload.ingredients.is_empty());
    }

    #[test]
    fn test_only_pascal_and_lowercase_keys_are_accepted() {
        for body in [
            r#"{"NAME":"Soup","DESCRIPTION":"Hot"}"#,
            r#"{"nAmE":"Soup","Description":"Hot"}"#,
        ] {
            let result: Result<RecipePayload, _> = serde_json::from_str(body);
            assert!(result.is_err(), "{body} should not parse");
        }
    }

    #[test]
    fn test_missing_quantity_is_rejected() {
        let result: Result<RecipePayload, _> = serde_json::from_str(
            r#"{"Name":"Soup","Description":"Hot","Ingredients":[{"Name":"Salt","Unit":"tsp"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_details_serialize_with_pascal_case_keys() {
        let details = RecipeDetails::from(RecipeWithIngredients {
            recipe: Recipe {
                id: 3,
                recipe_name: "Soup".to_string(),
                description: "Hot".to_string(),
            },
            ingredients: vec![Ingredient {
                id: 9,
                ingredient_name: "Salt".to_string(),
                quantity: 1,
                unit: "tsp".to_string(),
            }],
        });

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["Recipe"]["Id"], 3);
        assert_eq!(json["Recipe"]["Name"], "Soup");
        assert_eq!(json["Recipe"]["Description"], "Hot");
        assert_eq!(json["Ingredients"][0]["Name"], "Salt");
        assert_eq!(json["Ingredients"][0]["Quantity"], 1);
        assert_eq!(json["Ingredients"][0]["Unit"], "tsp");
        assert!(json["Ingredients"][0].get("RecipeId").is_none());
    }
}
