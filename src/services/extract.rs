use serde::Deserialize;

use crate::error::AnalysisError;

/// Substituted when the model omits the portion weight. A plausible
/// estimate beats an outright error here.
pub const DEFAULT_PORTION_WEIGHT_G: f64 = 200.0;

/// The record the vision model is asked to produce.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionReply {
    #[serde(default)]
    pub dish: String,
    #[serde(default)]
    pub weight_g: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub calories: Option<f64>,
}

impl VisionReply {
    pub fn portion_weight_g(&self) -> f64 {
        match self.weight_g {
            Some(w) if w > 0.0 => w,
            _ => DEFAULT_PORTION_WEIGHT_G,
        }
    }
}

/// Recover a structured reply from raw model output. Staged fallback:
/// strip code fences, try a direct parse, then slice from the first `{`
/// to the last `}` (no bracket balancing). Anything less yields
/// `UnrecognizedDish` with the raw text preserved for diagnostics.
pub fn extract_reply(raw: &str) -> Result<VisionReply, AnalysisError> {
    let stripped = strip_fences(raw);

    let parsed: Option<VisionReply> = serde_json::from_str(stripped)
        .ok()
        .or_else(|| brace_slice(stripped).and_then(|s| serde_json::from_str(s).ok()));

    match parsed {
        Some(reply) if !reply.dish.trim().is_empty() => Ok(reply),
        _ => Err(AnalysisError::UnrecognizedDish {
            raw: raw.to_string(),
        }),
    }
}

/// Remove enclosing triple-backtick fences, with or without a language tag.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    // A language tag occupies the rest of the opening-fence line.
    let rest = match rest.split_once('\n') {
        Some((first, body)) if first.chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest,
    };
    rest.trim()
}

/// Substring from the first `{` to the last `}`, inclusive. Tolerates
/// prose around a single JSON object.
fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str =
        r#"{"dish": "борщ", "weight_g": 300, "ingredients": ["свекла", "капуста"], "calories": 180}"#;

    #[test]
    fn test_bare_json_object() {
        let reply = extract_reply(REPLY).unwrap();
        assert_eq!(reply.dish, "борщ");
        assert_eq!(reply.weight_g, Some(300.0));
        assert_eq!(reply.ingredients.len(), 2);
    }

    #[test]
    fn test_fenced_with_language_tag() {
        let raw = format!("```json\n{}\n```", REPLY);
        let reply = extract_reply(&raw).unwrap();
        assert_eq!(reply.dish, "борщ");
    }

    #[test]
    fn test_fenced_without_language_tag() {
        let raw = format!("```\n{}\n```", REPLY);
        let reply = extract_reply(&raw).unwrap();
        assert_eq!(reply.dish, "борщ");
    }

    #[test]
    fn test_prose_around_object() {
        let raw = format!(
            "Sure! Here is the analysis you asked for:\n{}\nLet me know if you need more.",
            REPLY
        );
        let reply = extract_reply(&raw).unwrap();
        assert_eq!(reply.dish, "борщ");
        assert_eq!(reply.calories, Some(180.0));
    }

    #[test]
    fn test_no_json_fails_with_raw_preserved() {
        let raw = "I cannot tell what this dish is.";
        match extract_reply(raw) {
            Err(AnalysisError::UnrecognizedDish { raw: kept }) => assert_eq!(kept, raw),
            other => panic!("expected UnrecognizedDish, got {:?}", other.map(|r| r.dish)),
        }
    }

    #[test]
    fn test_empty_dish_name_fails() {
        let raw = r#"{"dish": "", "weight_g": 100}"#;
        assert!(matches!(
            extract_reply(raw),
            Err(AnalysisError::UnrecognizedDish { .. })
        ));
    }

    #[test]
    fn test_missing_weight_defaults_to_200g() {
        let reply = extract_reply(r#"{"dish": "омлет"}"#).unwrap();
        assert_eq!(reply.portion_weight_g(), DEFAULT_PORTION_WEIGHT_G);
    }

    #[test]
    fn test_nonpositive_weight_defaults_to_200g() {
        let reply = extract_reply(r#"{"dish": "омлет", "weight_g": 0}"#).unwrap();
        assert_eq!(reply.portion_weight_g(), DEFAULT_PORTION_WEIGHT_G);
    }
}
