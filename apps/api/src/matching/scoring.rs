//! Job Scoring: how well one job fits one user profile.
//!
//! Five weighted categories summed, then expressed as a percentage of the total
//! weight. Every category counts toward the denominator even when the profile or
//! job carries no data for it, so a missing preference reads as a miss.
//!
//! Pure and total: no I/O, no randomness, absent fields contribute zero.

use std::collections::HashSet;

use serde::Serialize;

use crate::matching::profile::UserProfile;
use crate::models::job::{JobRecord, LocationType};

pub const SKILL_WEIGHT: f64 = 40.0;
pub const ROLE_WEIGHT: f64 = 25.0;
pub const EXPERIENCE_WEIGHT: f64 = 15.0;
pub const LOCATION_WEIGHT: f64 = 10.0;
pub const SALARY_WEIGHT: f64 = 10.0;

/// A partial skill overlap is boosted so ~2/3 coverage already earns full marks.
const SKILL_BOOST: f64 = 1.5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 0..=100
    pub score: u32,
    pub raw_score: u32,
    pub max_score: u32,
    pub details: MatchDetails,
}

/// Per-category "why this matched". A category is present only when it contributed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<SkillDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<RoleDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<BandDetail<ExperienceBand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<BandDetail<LocationBand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<BandDetail<SalaryBand>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDetail {
    pub matched: Vec<String>,
    pub count: usize,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDetail {
    /// Roles found in the title; partial hits carry a " (partial)" suffix.
    pub matched: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandDetail<B> {
    #[serde(rename = "match")]
    pub band: B,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceBand {
    Exact,
    Close,
    Distant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationBand {
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "exact")]
    Exact,
    #[serde(rename = "remote fallback")]
    RemoteFallback,
    #[serde(rename = "remote default")]
    RemoteDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SalaryBand {
    #[serde(rename = "meets requirement")]
    MeetsRequirement,
    #[serde(rename = "close")]
    Close,
}

/// How a profile skill is compared against a job's tags and skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillMatchMode {
    /// Either string contains the other. Lenient: "go" hits "django".
    #[default]
    Substring,
    /// Whole-term equality.
    Exact,
}

impl SkillMatchMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            SkillMatchMode::Exact
        } else {
            SkillMatchMode::Substring
        }
    }

    fn matches(self, user_skill: &str, job_skill: &str) -> bool {
        match self {
            SkillMatchMode::Substring => {
                job_skill.contains(user_skill) || user_skill.contains(job_skill)
            }
            SkillMatchMode::Exact => job_skill == user_skill,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub fn score_job(job: &JobRecord, profile: &UserProfile) -> MatchResult {
    score_job_with(job, profile, SkillMatchMode::Substring)
}

pub fn score_job_with(job: &JobRecord, profile: &UserProfile, mode: SkillMatchMode) -> MatchResult {
    let mut details = MatchDetails::default();
    let mut total = 0.0;

    let (points, detail) = score_skills(job, profile, mode);
    total += points;
    details.skills = detail;

    let (points, detail) = score_roles(job, profile);
    total += points;
    details.roles = detail;

    let (points, detail) = score_experience(job, profile);
    total += points;
    details.experience = detail;

    let (points, detail) = score_location(job, profile);
    total += points;
    details.location = detail;

    let (points, detail) = score_salary(job, profile);
    total += points;
    details.salary = detail;

    let max_score = SKILL_WEIGHT + ROLE_WEIGHT + EXPERIENCE_WEIGHT + LOCATION_WEIGHT + SALARY_WEIGHT;

    MatchResult {
        score: round_points(total / max_score * 100.0).min(100),
        raw_score: round_points(total),
        max_score: max_score as u32,
        details,
    }
}

fn round_points(points: f64) -> u32 {
    points.round().max(0.0) as u32
}

/// Lowercased, trimmed, non-empty, first occurrence kept.
fn normalize_set<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Categories
// ────────────────────────────────────────────────────────────────────────────

fn score_skills(
    job: &JobRecord,
    profile: &UserProfile,
    mode: SkillMatchMode,
) -> (f64, Option<SkillDetail>) {
    let user_skills = normalize_set(&profile.skills);
    let job_skills = normalize_set(job.tags.iter().chain(&job.skills));
    if user_skills.is_empty() || job_skills.is_empty() {
        return (0.0, None);
    }

    let matched: Vec<String> = user_skills
        .iter()
        .filter(|skill| job_skills.iter().any(|js| mode.matches(skill, js)))
        .cloned()
        .collect();
    if matched.is_empty() {
        return (0.0, None);
    }

    let ratio = matched.len() as f64 / user_skills.len() as f64;
    let points = (ratio * SKILL_WEIGHT * SKILL_BOOST).min(SKILL_WEIGHT);
    let detail = SkillDetail {
        count: matched.len(),
        matched,
        score: round_points(points),
    };
    (points, Some(detail))
}

fn score_roles(job: &JobRecord, profile: &UserProfile) -> (f64, Option<RoleDetail>) {
    let roles = normalize_set(&profile.desired_roles);
    if roles.is_empty() {
        return (0.0, None);
    }

    let title = job.title.to_lowercase();
    let share = ROLE_WEIGHT / roles.len() as f64;
    let mut points = 0.0;
    let mut matched = Vec::new();

    for role in roles.iter().filter(|role| title.contains(role.as_str())) {
        points += share;
        matched.push(role.clone());
    }

    if points == 0.0 {
        let title_words: Vec<&str> = title.split_whitespace().collect();
        for role in &roles {
            let partial = role.split_whitespace().any(|rw| {
                title_words
                    .iter()
                    .any(|tw| tw.contains(rw) || rw.contains(*tw))
            });
            if partial {
                points += share * 0.5;
                matched.push(format!("{role} (partial)"));
            }
        }
    }

    if matched.is_empty() {
        return (0.0, None);
    }

    let points = points.min(ROLE_WEIGHT);
    let detail = RoleDetail {
        matched,
        score: round_points(points),
    };
    (points, Some(detail))
}

fn score_experience(
    job: &JobRecord,
    profile: &UserProfile,
) -> (f64, Option<BandDetail<ExperienceBand>>) {
    let (Some(wanted), Some(offered)) = (profile.experience_level, job.experience_level) else {
        return (0.0, None);
    };

    let (band, factor) = match wanted.rank().abs_diff(offered.rank()) {
        0 => (ExperienceBand::Exact, 1.0),
        1 => (ExperienceBand::Close, 0.7),
        2 => (ExperienceBand::Distant, 0.3),
        _ => return (0.0, None),
    };

    let points = EXPERIENCE_WEIGHT * factor;
    (
        points,
        Some(BandDetail {
            band,
            score: round_points(points),
        }),
    )
}

fn score_location(job: &JobRecord, profile: &UserProfile) -> (f64, Option<BandDetail<LocationBand>>) {
    let location = job.location.as_deref().unwrap_or_default().to_lowercase();
    let typed_remote = job.location_type == Some(LocationType::Remote);
    let desired = normalize_set(&profile.desired_locations);

    let (band, factor) = if profile.remote_only && (typed_remote || location.contains("remote")) {
        (LocationBand::Remote, 1.0)
    } else if !desired.is_empty() {
        if desired.iter().any(|loc| location.contains(loc.as_str())) {
            (LocationBand::Exact, 1.0)
        } else if typed_remote {
            (LocationBand::RemoteFallback, 0.8)
        } else {
            return (0.0, None);
        }
    } else if typed_remote {
        (LocationBand::RemoteDefault, 0.5)
    } else {
        return (0.0, None);
    };

    let points = LOCATION_WEIGHT * factor;
    (
        points,
        Some(BandDetail {
            band,
            score: round_points(points),
        }),
    )
}

fn score_salary(job: &JobRecord, profile: &UserProfile) -> (f64, Option<BandDetail<SalaryBand>>) {
    let Some(wanted) = profile.min_salary.filter(|v| *v > 0.0) else {
        return (0.0, None);
    };
    let Some(offered) = job.salary.as_ref().and_then(|s| s.comparable()) else {
        return (0.0, None);
    };

    let (band, factor) = if offered >= wanted {
        (SalaryBand::MeetsRequirement, 1.0)
    } else if offered >= wanted * 0.9 {
        (SalaryBand::Close, 0.5)
    } else {
        return (0.0, None);
    };

    let points = SALARY_WEIGHT * factor;
    (
        points,
        Some(BandDetail {
            band,
            score: round_points(points),
        }),
    )
}
