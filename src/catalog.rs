//! # Catalog Client Module
//!
//! Typed access to TheMealDB's three read endpoints. Every call is a single
//! GET with no retries and no caching; an empty result is not an error.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::CatalogError;
use crate::recipe::{Category, RawRecipe, RecipeSummary};

/// Public TheMealDB endpoint using the shared test key
pub const DEFAULT_CATALOG_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Read-only view of a recipe catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All categories, in catalog order
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Recipes in a category (id and native name only)
    async fn filter_by_category(&self, category: &str) -> Result<Vec<RecipeSummary>, CatalogError>;

    /// Full record for one recipe, `None` when the id is unknown
    async fn lookup_by_id(&self, id: &str) -> Result<Option<RawRecipe>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Option<Vec<CategoryRecord>>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    #[serde(rename = "strCategory")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct FilterResponse {
    #[serde(default)]
    meals: Option<Vec<MealRecord>>,
}

#[derive(Debug, Deserialize)]
struct MealRecord {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    meals: Option<Vec<RawRecipe>>,
}

fn categories_from_body(body: &str) -> Result<Vec<Category>, CatalogError> {
    let response: CategoriesResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(response
        .categories
        .unwrap_or_default()
        .into_iter()
        .map(|record| Category { name: record.name })
        .collect())
}

fn summaries_from_body(body: &str) -> Result<Vec<RecipeSummary>, CatalogError> {
    let response: FilterResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(response
        .meals
        .unwrap_or_default()
        .into_iter()
        .map(|meal| RecipeSummary::new(meal.id, meal.name))
        .collect())
}

fn recipe_from_body(body: &str) -> Result<Option<RawRecipe>, CatalogError> {
    let response: LookupResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(response.meals.unwrap_or_default().into_iter().next())
}

/// HTTP client for TheMealDB
pub struct MealDbClient {
    base_url: String,
    client: reqwest::Client,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, ?query, "Catalog request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Catalog for MealDbClient {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let body = self.get("categories.php", &[]).await?;
        categories_from_body(&body)
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RecipeSummary>, CatalogError> {
        let body = self.get("filter.php", &[("c", category)]).await?;
        summaries_from_body(&body)
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<RawRecipe>, CatalogError> {
        let body = self.get("lookup.php", &[("i", id)]).await?;
        recipe_from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MealDbClient::new("https://www.themealdb.com/api/json/v1/1/");
        assert_eq!(client.base_url(), DEFAULT_CATALOG_URL);
    }

    #[test]
    fn test_categories_keep_catalog_order() {
        let body = r#"{"categories":[
            {"idCategory":"1","strCategory":"Beef","strCategoryThumb":"x","strCategoryDescription":"y"},
            {"idCategory":"2","strCategory":"Chicken","strCategoryThumb":"x","strCategoryDescription":"y"}
        ]}"#;
        let categories = categories_from_body(body).unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beef", "Chicken"]);
    }

    #[test]
    fn test_missing_categories_is_empty() {
        assert!(categories_from_body("{}").unwrap().is_empty());
        assert!(categories_from_body(r#"{"categories":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_filter_null_meals_is_empty() {
        assert!(summaries_from_body(r#"{"meals":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_filter_parses_summaries() {
        let body = r#"{"meals":[{"strMeal":"Beef Wellington","strMealThumb":"x","idMeal":"52803"}]}"#;
        let meals = summaries_from_body(body).unwrap();
        assert_eq!(meals, vec![RecipeSummary::new("52803", "Beef Wellington")]);
    }

    #[test]
    fn test_lookup_unknown_id_is_none() {
        assert!(recipe_from_body(r#"{"meals":null}"#).unwrap().is_none());
    }

    #[test]
    fn test_lookup_parses_first_record() {
        let body = r#"{"meals":[{"idMeal":"52803","strMeal":"Beef Wellington",
            "strInstructions":"Wrap it.","strIngredient1":"Beef Fillet","strMeasure1":"750g"}]}"#;
        let recipe = recipe_from_body(body).unwrap().unwrap();
        assert_eq!(recipe.id, "52803");
        assert_eq!(recipe.field("strIngredient1"), Some("Beef Fillet"));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = categories_from_body("<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
