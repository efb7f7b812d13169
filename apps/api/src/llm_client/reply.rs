// Deserializers for loosely typed model replies.
// Models sometimes quote numbers ("7") or send null; neither should fail a whole reply.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// A number, or a string holding one. Anything else is `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(NumberOrText::Other(_)) | None => None,
    })
}

/// Non-negative whole count, truncated. Missing or unreadable values become 0.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|n| n.is_finite())
        .map(|n| n.trunc().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}
