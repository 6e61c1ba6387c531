use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub type JobId = Uuid;

/// Seniority ladder shared by job postings, user preferences and resume analysis.
/// Variant order is significant: matching compares positions on this ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Intern,
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 6] = [
        ExperienceLevel::Intern,
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Lead,
        ExperienceLevel::Executive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Intern => "intern",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
        }
    }

    /// Case-insensitive lookup. Unknown values resolve to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn rank(self) -> usize {
        self as usize
    }

    /// Band implied by an explicit years-of-experience figure.
    pub fn from_years(years: u32) -> Self {
        match years {
            0 => ExperienceLevel::Intern,
            1..=2 => ExperienceLevel::Entry,
            3..=4 => ExperienceLevel::Mid,
            5..=9 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Executive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Remote,
    Hybrid,
    Onsite,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Remote => "remote",
            LocationType::Hybrid => "hybrid",
            LocationType::Onsite => "onsite",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "remote" => Some(LocationType::Remote),
            "hybrid" => Some(LocationType::Hybrid),
            "onsite" => Some(LocationType::Onsite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Expired,
    Filled,
    Removed,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "active" => Some(JobStatus::Active),
            "expired" => Some(JobStatus::Expired),
            "filled" => Some(JobStatus::Filled),
            "removed" => Some(JobStatus::Removed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
    pub period: Option<String>,
}

impl Salary {
    /// Figure compared against a user's minimum: the top of the range, else the bottom.
    /// Zero is treated as "not stated".
    pub fn comparable(&self) -> Option<f64> {
        self.max
            .filter(|v| *v > 0.0)
            .or(self.min.filter(|v| *v > 0.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub website: Option<String>,
    /// Y Combinator batch, e.g. "W24". Presence marks a YC posting.
    pub yc_batch: Option<String>,
}

/// A job posting as seen by the matcher. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub company: Option<Company>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub location_type: Option<LocationType>,
    pub experience_level: Option<ExperienceLevel>,
    pub salary: Option<Salary>,
    pub source: String,
    pub apply_url: Option<String>,
    pub founders: Vec<Founder>,
    pub status: JobStatus,
    pub featured: bool,
    pub scraped_at: DateTime<Utc>,
}

pub const YCOMBINATOR_SOURCE: &str = "YCombinator";

impl JobRecord {
    /// YC postings come either from the YC source or carry a company batch.
    pub fn is_ycombinator(&self) -> bool {
        self.source.eq_ignore_ascii_case(YCOMBINATOR_SOURCE)
            || self
                .company
                .as_ref()
                .and_then(|c| c.yc_batch.as_deref())
                .is_some_and(|batch| !batch.trim().is_empty())
    }

    pub fn has_founders(&self) -> bool {
        !self.founders.is_empty()
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }
}

/// Flat `jobs` table row.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub company_yc_batch: Option<String>,
    pub tags: Vec<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub location_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub source: String,
    pub apply_url: Option<String>,
    pub founders: Json<Vec<Founder>>,
    pub status: String,
    pub featured: bool,
    pub scraped_at: DateTime<Utc>,
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        let company = row.company_name.map(|name| Company {
            name,
            website: row.company_website,
            yc_batch: row.company_yc_batch,
        });

        let salary = if row.salary_min.is_some() || row.salary_max.is_some() {
            Some(Salary {
                min: row.salary_min,
                max: row.salary_max,
                currency: row.salary_currency,
                period: row.salary_period,
            })
        } else {
            None
        };

        JobRecord {
            id: row.id,
            title: row.title,
            company,
            description: row.description,
            tags: row.tags,
            skills: row.skills,
            location: row.location,
            location_type: row.location_type.as_deref().and_then(LocationType::parse),
            experience_level: row
                .experience_level
                .as_deref()
                .and_then(ExperienceLevel::parse),
            salary,
            source: row.source,
            apply_url: row.apply_url,
            founders: row.founders.0,
            status: JobStatus::parse(&row.status).unwrap_or(JobStatus::Removed),
            featured: row.featured,
            scraped_at: row.scraped_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_job(title: &str) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: None,
        description: None,
        tags: vec![],
        skills: vec![],
        location: None,
        location_type: None,
        experience_level: None,
        salary: None,
        source: "RemoteOK".to_string(),
        apply_url: None,
        founders: vec![],
        status: JobStatus::Active,
        featured: false,
        scraped_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_parse_is_case_insensitive() {
        assert_eq!(ExperienceLevel::parse(" Senior "), Some(ExperienceLevel::Senior));
        assert_eq!(ExperienceLevel::parse("staff"), None);
    }

    #[test]
    fn test_experience_level_rank_follows_ladder() {
        assert_eq!(ExperienceLevel::Intern.rank(), 0);
        assert_eq!(ExperienceLevel::Executive.rank(), 5);
        assert!(ExperienceLevel::Lead > ExperienceLevel::Senior);
    }

    #[test]
    fn test_from_years_bands() {
        assert_eq!(ExperienceLevel::from_years(0), ExperienceLevel::Intern);
        assert_eq!(ExperienceLevel::from_years(2), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(4), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::from_years(5), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(10), ExperienceLevel::Executive);
    }

    #[test]
    fn test_salary_comparable_prefers_max() {
        let salary = Salary {
            min: Some(90_000.0),
            max: Some(120_000.0),
            ..Default::default()
        };
        assert_eq!(salary.comparable(), Some(120_000.0));

        let only_min = Salary {
            min: Some(90_000.0),
            max: Some(0.0),
            ..Default::default()
        };
        assert_eq!(only_min.comparable(), Some(90_000.0));
    }

    #[test]
    fn test_is_ycombinator_by_source_or_batch() {
        let mut job = sample_job("Backend Engineer");
        assert!(!job.is_ycombinator());

        job.source = "ycombinator".to_string();
        assert!(job.is_ycombinator());

        job.source = "RemoteOK".to_string();
        job.company = Some(Company {
            name: "Acme".to_string(),
            yc_batch: Some("W24".to_string()),
            ..Default::default()
        });
        assert!(job.is_ycombinator());
    }

    #[test]
    fn test_job_record_serializes_camel_case() {
        let mut job = sample_job("Engineer");
        job.location_type = Some(LocationType::Remote);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["locationType"], "remote");
        assert!(value.get("scrapedAt").is_some());
    }
}
