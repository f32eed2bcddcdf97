use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized image ready for the vision call: bare base64 payload,
/// transport prefix already stripped.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub data: String,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }

    pub fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype {
            "jpeg" | "jpg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            _ => None,
        }
    }
}

/// Physical object placed in frame so the model can judge absolute scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    #[default]
    Card,
    Spoon,
    Glass,
}

#[derive(Debug, Clone, Copy)]
pub struct ReferenceObject {
    pub kind: ReferenceKind,
    pub label: &'static str,
    pub physical_size: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

/// Per-request user parameters. Not persisted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "weightKg")]
    pub weight_kg: f64,
    #[serde(rename = "heightCm")]
    pub height_cm: f64,
    pub sex: Sex,
    #[serde(rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Macro masses for one serving, grams, rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Macros {
    pub protein_g: i64,
    pub fat_g: i64,
    pub carb_g: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishEstimate {
    pub dish_name: String,
    pub portion_weight_g: f64,
    pub ingredients: Vec<String>,
    pub calories: i64,
    pub macros: Macros,
}

/// Which tier produced the nutrition numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutritionSource {
    OpenFoodFacts,
    Estimated,
}

impl std::fmt::Display for NutritionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NutritionSource::OpenFoodFacts => "OpenFoodFacts",
            NutritionSource::Estimated => "Estimated",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealClassification {
    Under,
    Near,
    Over,
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetVerdict {
    pub daily_calorie_budget: i64,
    pub classification: MealClassification,
}

/// One analyzed meal in the local day log. Append-only; removed only by
/// an explicit day clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub estimate: DishEstimate,
    pub recorded_at: DateTime<Utc>,
}
