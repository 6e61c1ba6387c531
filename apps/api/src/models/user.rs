use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::ExperienceLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Premium,
    Enterprise,
}

impl SubscriptionPlan {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "premium" => SubscriptionPlan::Premium,
            "enterprise" => SubscriptionPlan::Enterprise,
            _ => SubscriptionPlan::Free,
        }
    }

    /// Any paid plan lifts the fixed free-tier quota.
    pub fn is_premium(self) -> bool {
        self != SubscriptionPlan::Free
    }
}

/// Stored levels are free text; unrecognised values read as unset.
fn lenient_experience_level<'de, D>(deserializer: D) -> Result<Option<ExperienceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(ExperienceLevel::parse))
}

/// Explicit job preferences a user set during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub desired_roles: Vec<String>,
    pub desired_locations: Vec<String>,
    pub remote_only: bool,
    pub min_salary: Option<f64>,
    #[serde(deserialize_with = "lenient_experience_level")]
    pub experience_level: Option<ExperienceLevel>,
    pub skills: Vec<String>,
}

/// Resume analysis as persisted against a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredResumeAnalysis {
    pub skills: Vec<String>,
    pub preferred_roles: Vec<String>,
    #[serde(deserialize_with = "lenient_experience_level")]
    pub experience_level: Option<ExperienceLevel>,
    pub years_of_experience: Option<u32>,
    pub potential_titles: Vec<String>,
    pub resume_file_name: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub plan: SubscriptionPlan,
    pub preferences: Preferences,
    pub resume_analysis: Option<StoredResumeAnalysis>,
}

impl UserRecord {
    pub fn has_resume(&self) -> bool {
        self.resume_analysis
            .as_ref()
            .is_some_and(|analysis| !analysis.skills.is_empty())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub plan: String,
    pub preferences: Json<Preferences>,
    pub resume_analysis: Option<Json<StoredResumeAnalysis>>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            email: row.email,
            plan: SubscriptionPlan::parse(&row.plan),
            preferences: row.preferences.0,
            resume_analysis: row.resume_analysis.map(|json| json.0),
        }
    }
}
