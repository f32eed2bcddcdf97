use crate::models::ReferenceObject;

/// System and user instruction blocks for one vision call.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Build the instruction pair for a food photo, parameterized by the
/// reference object used for scale. The strict-JSON contract here is what
/// the response extractor relies on; the extractor still tolerates
/// non-compliance.
pub fn compose(reference: &ReferenceObject) -> PromptPair {
    let system = "You are a food analysis assistant. You examine a photo of a meal \
                  and estimate what it is and how much it weighs. You always answer \
                  with a single JSON object and nothing else: no markdown, no code \
                  fences, no explanations, no text before or after the JSON."
        .to_string();

    let user = format!(
        "Analyze this food photo. A {label} ({size}) is visible in the frame; \
         use it to judge the absolute size of the portion.\n\
         Determine: the dish name, the portion weight in grams, the main \
         ingredients, and an estimate of total calories.\n\
         Reply with ONLY this JSON object:\n\
         {{\"dish\": \"...\", \"weight_g\": number, \"ingredients\": [\"...\"], \"calories\": number}}",
        label = reference.label,
        size = reference.physical_size,
    );

    PromptPair { system, user }
}
