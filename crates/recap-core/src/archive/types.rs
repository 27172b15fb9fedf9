//! Wire types of the archive endpoints.
//!
//! The upstream API is loose about scalar types (scores arrive as strings,
//! sometimes as numbers; ratings may be null), so the fields that vary are
//! deserialized leniently. An explicit `null` reads as the field's default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::Button;

/// One pattern entry of a board floor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPatternRecord {
    pub title: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub composer: String,
    pub pattern: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub score: Option<String>,
    #[serde(default)]
    pub max_combo: Option<u8>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub djpower: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: f64,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dlc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dlc_code: String,
}

/// Floor of a board (a level bin)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFloor {
    #[serde(default, deserialize_with = "lenient_number")]
    pub floor_number: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patterns: Vec<RawPatternRecord>,
}

/// Response of `GET /api/archive/{nickname}/board/{button}/{board}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub board: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub button: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub floors: Vec<BoardFloor>,
}

impl BoardResponse {
    /// Button reported by the response, if it names a known button
    pub fn reported_button(&self) -> Option<Button> {
        self.button
            .as_deref()
            .and_then(|b| b.trim().parse::<u8>().ok())
            .and_then(Button::from_u8)
    }

    /// Iterate over every pattern of every floor
    pub fn patterns(&self) -> impl Iterator<Item = &RawPatternRecord> {
        self.floors.iter().flat_map(|floor| floor.patterns.iter())
    }
}

/// Tier rank descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveTier {
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
}

/// Entry of a tier response's top list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopListEntry {
    pub title: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub button: Button,
    pub pattern: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub level: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub floor: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub max_rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub score: Option<String>,
    #[serde(default)]
    pub max_combo: Option<u8>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Response of `GET /api/archive/{nickname}/tier/{button}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub top50sum: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tier_point: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier: ArchiveTier,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next: ArchiveTier,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_list: Vec<TopListEntry>,
}

/// Error body of the archive API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// Accept a string or a number, keeping it as text
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept a number or a numeric string; anything else (or non-finite) is 0
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match JsonValue::deserialize(deserializer)? {
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JsonValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_response_parses_loose_fields() {
        let json = r#"{
            "success": true,
            "board": "SC",
            "button": "4",
            "totalCount": 2,
            "floors": [
                {
                    "floorNumber": 15.1,
                    "patterns": [
                        {
                            "title": 100, "name": "Song", "composer": "Artist",
                            "pattern": "SC", "score": "99.81", "maxCombo": 1,
                            "djpower": 210.5, "rating": 210,
                            "updatedAt": "2025-03-01T12:00:00.000Z",
                            "dlc": "Respect", "dlcCode": "R"
                        },
                        {
                            "title": 101, "name": "Other", "composer": "Artist",
                            "pattern": "SC", "score": null, "maxCombo": null,
                            "djpower": null, "rating": null,
                            "updatedAt": null, "dlc": "Respect", "dlcCode": "R"
                        }
                    ]
                },
                { "floorNumber": 14, "patterns": null }
            ]
        }"#;

        let board: BoardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(board.reported_button(), Some(Button::B4));
        assert_eq!(board.patterns().count(), 2);

        let first = &board.floors[0].patterns[0];
        assert_eq!(first.score.as_deref(), Some("99.81"));
        assert_eq!(first.max_combo, Some(1));
        assert_eq!(first.dlc_code, "R");

        let second = &board.floors[0].patterns[1];
        assert!(second.score.is_none());
        assert!(second.updated_at.is_none());
        assert_eq!(second.djpower, 0.0);
        assert_eq!(second.rating, 0.0);
    }

    #[test]
    fn test_numeric_score_is_kept_as_text() {
        let json = r#"{"title": 5, "pattern": "NM", "score": 100}"#;
        let record: RawPatternRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.score.as_deref(), Some("100"));
    }

    #[test]
    fn test_null_text_and_count_fields_default() {
        let json = r#"{
            "success": null,
            "button": "5",
            "totalCount": null,
            "floors": [
                {
                    "floorNumber": 3,
                    "patterns": [
                        {
                            "title": 7, "name": null, "composer": null,
                            "pattern": "HD", "score": "95", "maxCombo": 0,
                            "updatedAt": "2025-02-01T00:00:00Z",
                            "dlc": null, "dlcCode": null
                        }
                    ]
                }
            ]
        }"#;

        let board: BoardResponse = serde_json::from_str(json).unwrap();
        assert!(!board.success);
        assert_eq!(board.total_count, 0);

        let pattern = &board.floors[0].patterns[0];
        assert_eq!(pattern.name, "");
        assert_eq!(pattern.composer, "");
        assert_eq!(pattern.dlc, "");
        assert_eq!(pattern.dlc_code, "");
        assert_eq!(pattern.score.as_deref(), Some("95"));
    }

    #[test]
    fn test_null_tier_defaults() {
        let json = r#"{"success": true, "tierPoint": 0, "tier": null, "next": {"name": null, "code": null}}"#;
        let tier: TierResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tier.tier, ArchiveTier::default());
        assert_eq!(tier.next.name, "");
    }

    #[test]
    fn test_tier_response_parses() {
        let json = r#"{
            "success": true,
            "top50sum": 7421.3,
            "tierPoint": 7421.3,
            "tier": { "rating": 7400, "name": "Diamond I", "code": "DM1" },
            "next": { "rating": 7600, "name": "Master III", "code": "MA3" },
            "topList": [
                {
                    "title": 100, "name": "Song", "button": 6, "pattern": "SC",
                    "level": 12, "floor": "12.5", "maxRating": "210.000",
                    "score": "99.90", "maxCombo": 1, "rating": "209.790",
                    "updatedAt": "2025-05-05T00:00:00.000Z"
                }
            ]
        }"#;

        let tier: TierResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tier.tier.name, "Diamond I");
        assert_eq!(tier.next.code, "MA3");
        assert_eq!(tier.top_list.len(), 1);
        assert_eq!(tier.top_list[0].button, Button::B6);
        assert_eq!(tier.top_list[0].rating.as_deref(), Some("209.790"));
    }

    #[test]
    fn test_error_body() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"success": false, "errorCode": 101, "message": "x"}"#)
                .unwrap();
        assert_eq!(body.error_code, Some(101));

        let empty: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.error_code, None);
    }
}
