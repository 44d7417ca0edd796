use crate::error::ConsoleError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Buddy
// ---------------------------------------------------------------------------

/// Roster entry: the summary every list consumer sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buddy {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Usage counters for one buddy. Missing or `null` fields decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_questions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_patients: u64,
    /// Percentage in `0..=100`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_rate: f64,
    /// Score in `0..=5`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
}

impl Analytics {
    pub fn response_rate_label(&self) -> String {
        format!("{}%", self.response_rate)
    }

    pub fn average_rating_label(&self) -> String {
        rating_label(self.average_rating)
    }
}

fn rating_label(rating: f64) -> String {
    format!("{rating}/5")
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "flexible_timestamp")]
    pub uploaded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// BuddyDetail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuddyDetail {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub whatsapp_number: String,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Analytics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
}

impl BuddyDetail {
    pub fn summary(&self) -> Buddy {
        Buddy {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Messaging handle patients open to reach this buddy, e.g. `wa.me/15550100`.
    ///
    /// Derived on every call so it always tracks `whatsapp_number`.
    pub fn contact_handle(&self) -> String {
        format!("wa.me/{}", self.whatsapp_number)
    }

    /// The message a patient sends to link their chat to this buddy.
    pub fn connect_command(&self) -> String {
        format!("CONNECT {}", self.id)
    }
}

// ---------------------------------------------------------------------------
// ImpactSummary
// ---------------------------------------------------------------------------

/// Aggregate metrics across every buddy for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_buddies: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_patients: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_conversations: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
}

impl ImpactSummary {
    pub fn average_rating_label(&self) -> String {
        rating_label(self.average_rating)
    }
}

// ---------------------------------------------------------------------------
// ReportingPeriod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    Today,
    Week,
    #[default]
    Month,
}

impl ReportingPeriod {
    pub fn all() -> &'static [ReportingPeriod] {
        &[
            ReportingPeriod::Today,
            ReportingPeriod::Week,
            ReportingPeriod::Month,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportingPeriod::Today => "today",
            ReportingPeriod::Week => "week",
            ReportingPeriod::Month => "month",
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportingPeriod {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(ReportingPeriod::Today),
            "week" => Ok(ReportingPeriod::Week),
            "month" => Ok(ReportingPeriod::Month),
            _ => Err(ConsoleError::InvalidPeriod(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Deserialization helpers
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    })
}

/// Accepts RFC 3339 or a bare ISO-8601 datetime, which is taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
