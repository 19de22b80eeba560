//! Request payloads accepted from the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct CollegePayload {
    pub name: String,
    pub abbrv: String,
}

#[derive(Debug, Deserialize)]
pub struct ProgrammePayload {
    #[serde(default)]
    pub abbrv: String,
    pub name: String,
    /// Forms submit years as either a number or a numeric string.
    #[serde(default, deserialize_with = "deserialize_years")]
    pub years: u32,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn deserialize_years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(years)) => years,
        Some(Raw::Text(raw)) => raw.trim().parse().unwrap_or(0),
        None => 0,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub full_name: String,
    pub reg_no: String,
    pub college_id: String,
    #[serde(default)]
    pub programme_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    /// Comma-separated role list.
    #[serde(default)]
    pub roles: String,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPayload {
    pub author_id: String,
    pub author_name: String,
    pub college_abbrv: String,
    pub college_id: String,
    pub college_name: String,
    /// Comma-separated author roles.
    #[serde(default)]
    pub roles: String,
    pub body: String,
    pub department: String,
    pub title: String,
    /// Comma-separated visibility audiences.
    #[serde(default)]
    pub visibility: String,
    /// Retained URLs first, freshly uploaded ones appended after them.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Parses the date forms the dashboard submits: RFC 3339, or a plain
/// `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
