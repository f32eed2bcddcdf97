use std::sync::Arc;

use chrono::{Local, Utc};

use crate::error::AnalysisError;
use crate::models::{BudgetVerdict, DishEstimate, NutritionSource, ReferenceKind, UserProfile};
use crate::services::{budget, extract, image, prompt, reference};
use crate::services::{DailyLedger, NutritionEnricher, VisionService};

/// Result of one analyzed photo: the complete estimate plus the budget
/// verdict computed against today's ledger.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub estimate: DishEstimate,
    pub source: NutritionSource,
    pub verdict: BudgetVerdict,
}

/// Runs the pipeline stages strictly in sequence:
/// normalize -> compose -> infer -> extract -> enrich -> budget -> append.
pub struct AnalysisHandler {
    vision: Arc<dyn VisionService>,
    enricher: Arc<NutritionEnricher>,
    ledger: Arc<DailyLedger>,
}

impl AnalysisHandler {
    pub fn new(
        vision: Arc<dyn VisionService>,
        enricher: Arc<NutritionEnricher>,
        ledger: Arc<DailyLedger>,
    ) -> Self {
        Self {
            vision,
            enricher,
            ledger,
        }
    }

    pub async fn analyze(
        &self,
        image_input: &str,
        profile: &UserProfile,
        reference_kind: ReferenceKind,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let image = image::normalize_image(image_input)?;

        let reference = reference::lookup(reference_kind);
        let prompts = prompt::compose(reference);
        log::info!(
            "📸 Analyzing photo ({}, reference: {})",
            image.media_type.mime(),
            reference.label
        );

        let raw = self
            .vision
            .infer(&image, &prompts.system, &prompts.user)
            .await?;

        let reply = extract::extract_reply(&raw)?;
        let weight_g = reply.portion_weight_g();
        log::info!("🍽️ Recognized '{}' at {} g", reply.dish, weight_g);

        let nutrition = self.enricher.enrich(&reply.dish, weight_g).await;

        let estimate = DishEstimate {
            dish_name: reply.dish,
            portion_weight_g: weight_g,
            ingredients: reply.ingredients,
            calories: nutrition.calories,
            macros: nutrition.macros,
        };

        // The verdict reflects the day's intake before this meal; the
        // meal itself is then appended.
        let now = Utc::now();
        let today_total = self.ledger.sum_for_day(now.with_timezone(&Local).date_naive());
        let verdict = budget::verdict(profile, today_total, estimate.calories);

        self.ledger.append(estimate.clone(), now)?;

        log::info!(
            "✅ {} kcal ({}), budget {} kcal, classified {:?}",
            estimate.calories,
            nutrition.source,
            verdict.daily_calorie_budget,
            verdict.classification
        );

        Ok(AnalysisOutcome {
            estimate,
            source: nutrition.source,
            verdict,
        })
    }

    pub fn ledger(&self) -> &DailyLedger {
        &self.ledger
    }
}
