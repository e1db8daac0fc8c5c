//! # Recipe Model Module
//!
//! Domain records produced by the catalog client and consumed by the
//! conversation controller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The catalog stores at most this many indexed ingredient/measure pairs
pub const MAX_INGREDIENTS: usize = 20;

/// A catalog category, used verbatim both as filter key and as choice label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// A recipe offered to the user as a choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Opaque catalog identifier
    pub id: String,
    /// Name as returned by the catalog
    pub native_name: String,
    /// Translated name, filled in only once the recipe is shown as a choice
    pub display_name: Option<String>,
}

impl RecipeSummary {
    pub fn new(id: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            native_name: native_name.into(),
            display_name: None,
        }
    }

    /// The label shown on the choice button
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.native_name)
    }
}

/// Full recipe record as the catalog's lookup endpoint returns it.
///
/// Indexed fields (`strIngredient1`, `strMeasure1`, ...) land in `fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipe {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl RawRecipe {
    /// Trimmed string value of a field; null, blank and non-string values are absent
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// One ingredient line; the measure is free text and never translated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

impl Ingredient {
    /// `"{name} ({measure})"`, or just the name when there is no measure
    pub fn display_line(&self) -> String {
        match &self.measure {
            Some(measure) => format!("{} ({})", self.name, measure),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
}

impl RecipeDetail {
    /// Build a detail from a raw record.
    ///
    /// Ingredients are read from index 1 up to [`MAX_INGREDIENTS`], stopping at
    /// the first absent ingredient slot.
    pub fn from_raw(raw: &RawRecipe) -> Self {
        let ingredients = (1..=MAX_INGREDIENTS)
            .map_while(|i| {
                let name = raw.field(&format!("strIngredient{i}"))?;
                Some(Ingredient {
                    name: name.to_string(),
                    measure: raw.field(&format!("strMeasure{i}")).map(str::to_string),
                })
            })
            .collect();

        Self {
            name: raw.name.trim().to_string(),
            instructions: raw
                .instructions
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawRecipe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_detail_stops_at_first_absent_ingredient() {
        let recipe = raw(r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strInstructions": "Preheat oven to 350F.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "water",
            "strMeasure2": " ",
            "strIngredient3": "",
            "strMeasure3": "",
            "strIngredient4": "brown sugar",
            "strMeasure4": "1/2 cup",
            "strIngredient5": null,
            "strMeasure5": null
        }"#);

        let detail = RecipeDetail::from_raw(&recipe);
        assert_eq!(detail.name, "Teriyaki Chicken Casserole");
        assert_eq!(detail.instructions, "Preheat oven to 350F.");
        assert_eq!(
            detail.ingredients,
            vec![
                Ingredient {
                    name: "soy sauce".to_string(),
                    measure: Some("3/4 cup".to_string()),
                },
                Ingredient {
                    name: "water".to_string(),
                    measure: None,
                },
            ]
        );
    }

    #[test]
    fn test_detail_reads_all_twenty_slots() {
        let mut body = serde_json::json!({
            "idMeal": "1",
            "strMeal": "Big Stew",
            "strInstructions": null
        });
        for i in 1..=25 {
            body[format!("strIngredient{i}")] = serde_json::json!(format!("item {i}"));
        }
        let recipe: RawRecipe = serde_json::from_value(body).unwrap();

        let detail = RecipeDetail::from_raw(&recipe);
        assert_eq!(detail.ingredients.len(), MAX_INGREDIENTS);
        assert_eq!(detail.ingredients[19].name, "item 20");
        assert_eq!(detail.instructions, "");
    }

    #[test]
    fn test_ingredient_display_line() {
        let with_measure = Ingredient {
            name: "Flour".to_string(),
            measure: Some("200g".to_string()),
        };
        let without_measure = Ingredient {
            name: "Salt".to_string(),
            measure: None,
        };
        assert_eq!(with_measure.display_line(), "Flour (200g)");
        assert_eq!(without_measure.display_line(), "Salt");
    }

    #[test]
    fn test_summary_label_falls_back_to_native_name() {
        let mut summary = RecipeSummary::new("52772", "Teriyaki Chicken Casserole");
        assert_eq!(summary.label(), "Teriyaki Chicken Casserole");

        summary.display_name = Some("Запеканка с курицей терияки".to_string());
        assert_eq!(summary.label(), "Запеканка с курицей терияки");
    }
}
