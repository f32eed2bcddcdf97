use base64::{engine::general_purpose, Engine};

use crate::error::AnalysisError;
use crate::models::{ImagePayload, MediaType};

/// Canonicalize an incoming image string into a bare base64 payload plus
/// media type. Accepts either a `data:image/<type>;base64,<payload>` URI
/// or a bare base64 string (assumed JPEG). Byte content passes through
/// unchanged; no resizing or re-encoding.
pub fn normalize_image(input: &str) -> Result<ImagePayload, AnalysisError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidImage("empty image payload".into()));
    }

    let (media_type, payload) = if let Some(rest) = trimmed.strip_prefix("data:") {
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| AnalysisError::InvalidImage("malformed data URI".into()))?;

        let subtype = header
            .strip_prefix("image/")
            .and_then(|h| h.split(';').next())
            .ok_or_else(|| AnalysisError::InvalidImage("data URI is not an image".into()))?;

        let media_type = MediaType::from_subtype(subtype).ok_or_else(|| {
            AnalysisError::InvalidImage(format!("unsupported image type: {}", subtype))
        })?;

        (media_type, data)
    } else {
        (MediaType::Jpeg, trimmed)
    };

    if payload.is_empty() {
        return Err(AnalysisError::InvalidImage("empty base64 payload".into()));
    }

    // Validate the alphabet without keeping the decoded bytes around.
    if general_purpose::STANDARD.decode(payload).is_err() {
        return Err(AnalysisError::InvalidImage(
            "payload is not valid base64".into(),
        ));
    }

    Ok(ImagePayload {
        data: payload.to_string(),
        media_type,
    })
}
