use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::models::{Macros, NutritionSource};

const DEFAULT_API_URL: &str = "https://world.openfoodfacts.org";
const LOOKUP_TIMEOUT_SECS: u64 = 8;

/// Per-100g nutrient profile.
#[derive(Debug, Clone, Copy)]
pub struct MacroProfile {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Keyword categories for dishes the food database does not know.
/// First match wins; keywords cover English and Russian dish names.
const CATEGORY_TABLE: &[(&[&str], MacroProfile)] = &[
    (
        &["salad", "veget", "салат", "овощ"],
        MacroProfile { kcal: 45.0, protein: 2.0, fat: 2.0, carbs: 5.0 },
    ),
    (
        &["meat", "beef", "poultry", "chicken", "steak", "мясо", "куриц", "говя", "котлет"],
        MacroProfile { kcal: 250.0, protein: 20.0, fat: 18.0, carbs: 2.0 },
    ),
    (
        &["fish", "salmon", "tuna", "рыб", "лосос", "тунец"],
        MacroProfile { kcal: 180.0, protein: 20.0, fat: 10.0, carbs: 0.0 },
    ),
    (
        &["pasta", "noodle", "spaghetti", "макарон", "паст", "спагетти", "лапш"],
        MacroProfile { kcal: 160.0, protein: 5.0, fat: 5.0, carbs: 25.0 },
    ),
    (
        &["rice", "grain", "porridge", "buckwheat", "каша", "рис", "гречк", "плов"],
        MacroProfile { kcal: 130.0, protein: 4.0, fat: 3.0, carbs: 25.0 },
    ),
    (
        &["soup", "суп", "борщ", "щи", "похлеб"],
        MacroProfile { kcal: 60.0, protein: 3.0, fat: 3.0, carbs: 6.0 },
    ),
];

/// Middle-of-the-road profile when no category matches.
const GENERIC_PROFILE: MacroProfile =
    MacroProfile { kcal: 150.0, protein: 5.0, fat: 7.0, carbs: 18.0 };

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    nutriments: Nutriments,
}

#[derive(Debug, Deserialize, Default)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal: Option<f64>,
    #[serde(rename = "proteins_100g")]
    proteins: Option<f64>,
    #[serde(rename = "fat_100g")]
    fat: Option<f64>,
    #[serde(rename = "carbohydrates_100g")]
    carbohydrates: Option<f64>,
}

/// Complete nutrition for one portion. Always macro-filled.
#[derive(Debug, Clone)]
pub struct DishNutrition {
    pub calories: i64,
    pub macros: Macros,
    pub source: NutritionSource,
}

/// Resolves per-100g nutrition for a dish name and scales it to the
/// portion. Tier 1 is an OpenFoodFacts text search; any failure there is
/// swallowed and the keyword table takes over, so enrichment never fails.
pub struct NutritionEnricher {
    client: reqwest::Client,
    api_url: String,
}

impl NutritionEnricher {
    pub fn new() -> Self {
        Self::with_api_url(DEFAULT_API_URL.to_string())
    }

    pub fn with_api_url(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    pub async fn enrich(&self, dish: &str, portion_weight_g: f64) -> DishNutrition {
        match self.lookup_food_database(dish).await {
            Ok(Some(profile)) => {
                log::info!("🥫 OpenFoodFacts match for '{}'", dish);
                scale(&profile, portion_weight_g, NutritionSource::OpenFoodFacts)
            }
            Ok(None) => {
                log::debug!("No OpenFoodFacts match for '{}', using heuristic", dish);
                scale(heuristic_profile(dish), portion_weight_g, NutritionSource::Estimated)
            }
            Err(e) => {
                // Enrichment is best-effort; a dead food database must not
                // abort the analysis.
                log::warn!("⚠️ OpenFoodFacts lookup failed for '{}': {}", dish, e);
                scale(heuristic_profile(dish), portion_weight_g, NutritionSource::Estimated)
            }
        }
    }

    async fn lookup_food_database(&self, dish: &str) -> Result<Option<MacroProfile>> {
        let url = format!("{}/cgi/search.pl", self.api_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_terms", dish),
                ("json", "1"),
                ("page_size", "1"),
            ])
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("food database returned HTTP {}", response.status());
        }

        let search: SearchResponse = response.json().await?;
        let Some(product) = search.products.into_iter().next() else {
            return Ok(None);
        };

        // A product without energy data is as useless as no product.
        let Some(kcal) = product.nutriments.energy_kcal else {
            return Ok(None);
        };

        Ok(Some(MacroProfile {
            kcal,
            protein: product.nutriments.proteins.unwrap_or(0.0),
            fat: product.nutriments.fat.unwrap_or(0.0),
            carbs: product.nutriments.carbohydrates.unwrap_or(0.0),
        }))
    }
}

impl Default for NutritionEnricher {
    fn default() -> Self {
        Self::new()
    }
}

fn heuristic_profile(dish: &str) -> &'static MacroProfile {
    let lowered = dish.to_lowercase();
    for (keywords, profile) in CATEGORY_TABLE {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return profile;
        }
    }
    &GENERIC_PROFILE
}

/// Linear per-100g scaling, each field rounded to the nearest integer.
fn scale(profile: &MacroProfile, portion_weight_g: f64, source: NutritionSource) -> DishNutrition {
    let per_portion = |per_100g: f64| (per_100g / 100.0 * portion_weight_g).round() as i64;
    DishNutrition {
        calories: per_portion(profile.kcal),
        macros: Macros {
            protein_g: per_portion(profile.protein),
            fat_g: per_portion(profile.fat),
            carb_g: per_portion(profile.carbs),
        },
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_is_exact() {
        let profile = MacroProfile { kcal: 150.0, protein: 5.0, fat: 7.0, carbs: 18.0 };
        let nutrition = scale(&profile, 250.0, NutritionSource::Estimated);

        assert_eq!(nutrition.calories, 375); // 150 / 100 * 250
        assert_eq!(nutrition.macros.protein_g, 13); // round(12.5)
        assert_eq!(nutrition.macros.fat_g, 18); // round(17.5)
        assert_eq!(nutrition.macros.carb_g, 45);
    }

    #[test]
    fn test_borscht_falls_into_soup_category() {
        let profile = heuristic_profile("Борщ");
        assert_eq!(profile.kcal, 60.0);

        let nutrition = scale(profile, 300.0, NutritionSource::Estimated);
        assert_eq!(nutrition.calories, 180); // round(60 / 100 * 300)
    }

    #[test]
    fn test_category_matching_is_case_insensitive() {
        assert_eq!(heuristic_profile("Chicken Curry").kcal, 250.0);
        assert_eq!(heuristic_profile("ОВОЩНОЙ САЛАТ").kcal, 45.0);
    }

    #[test]
    fn test_unknown_dish_gets_generic_profile() {
        let profile = heuristic_profile("mystery casserole");
        assert_eq!(profile.kcal, GENERIC_PROFILE.kcal);
    }

    #[test]
    fn test_first_matching_category_wins() {
        // "салат с курицей" matches salad before meat.
        assert_eq!(heuristic_profile("салат с курицей").kcal, 45.0);
    }

    #[test]
    fn test_nutriments_wire_names() {
        let json = r#"{
            "products": [{
                "nutriments": {
                    "energy-kcal_100g": 89.0,
                    "proteins_100g": 1.1,
                    "fat_100g": 0.3,
                    "carbohydrates_100g": 22.8
                }
            }]
        }"#;

        let search: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(search.products[0].nutriments.energy_kcal, Some(89.0));
        assert_eq!(search.products[0].nutriments.carbohydrates, Some(22.8));
    }

    #[test]
    fn test_empty_products_list_deserializes() {
        let search: SearchResponse = serde_json::from_str(r#"{"products": []}"#).unwrap();
        assert!(search.products.is_empty());
    }
}
