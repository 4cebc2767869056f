//! Structured itinerary model and marker extraction.
//!
//! The model is asked to emit a JSON itinerary between `ITINERARY_START` and
//! `ITINERARY_END` in its free-text reply. Extraction is best-effort: a
//! missing block is normal conversation, and a block that fails to parse is
//! reported as [`ItineraryOutcome::Malformed`] rather than an error.

use serde::{Deserialize, Serialize};

use super::persona::{ITINERARY_END, ITINERARY_START};

/// A day-by-day travel plan emitted by the model.
///
/// Exists only as a transient parse result of one response; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub duration: u32,
    pub traveler_info: TravelerInfo,
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
}

/// Trip-wide traveler details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerInfo {
    pub budget: String,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
}

/// One day of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// A single planned activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub time: String,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of scanning a reply for an embedded itinerary.
///
/// `NotPresent` and `Malformed` both collapse to "no itinerary" externally;
/// the distinction is kept so callers can log and tests can tell "the model
/// didn't try" from "the model tried and failed".
#[derive(Debug)]
pub enum ItineraryOutcome {
    Parsed(Itinerary),
    NotPresent,
    Malformed(serde_json::Error),
}

/// Scan `text` for an itinerary block and parse it.
///
/// Takes the substring strictly between the first occurrence of the start
/// marker and the first occurrence of the end marker after it, trimmed of
/// surrounding whitespace. Either marker missing means no itinerary.
pub fn extract(text: &str) -> ItineraryOutcome {
    let Some((_, after_start)) = text.split_once(ITINERARY_START) else {
        return ItineraryOutcome::NotPresent;
    };
    let Some((block, _)) = after_start.split_once(ITINERARY_END) else {
        return ItineraryOutcome::NotPresent;
    };

    match serde_json::from_str(block.trim()) {
        Ok(itinerary) => ItineraryOutcome::Parsed(itinerary),
        Err(err) => ItineraryOutcome::Malformed(err),
    }
}
