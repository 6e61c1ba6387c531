use crate::models::job::ExperienceLevel;
use crate::models::user::UserRecord;
use crate::resume::analyzer::ResumeAnalysis;

/// Matching input: explicit preferences merged with resume-derived signals.
/// Assembled fresh for every matching call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub skills: Vec<String>,
    pub desired_roles: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub desired_locations: Vec<String>,
    pub remote_only: bool,
    pub min_salary: Option<f64>,
}

impl UserProfile {
    /// Explicit preferences win for experience level; skills and roles are unioned.
    pub fn from_user(user: &UserRecord) -> Self {
        let prefs = &user.preferences;
        let resume = user.resume_analysis.as_ref();

        let resume_skills = resume.map(|r| r.skills.as_slice()).unwrap_or_default();
        let resume_roles = resume
            .map(|r| r.preferred_roles.as_slice())
            .unwrap_or_default();

        Self {
            skills: union(&prefs.skills, resume_skills),
            desired_roles: union(&prefs.desired_roles, resume_roles),
            experience_level: prefs
                .experience_level
                .or_else(|| resume.and_then(|r| r.experience_level)),
            desired_locations: prefs.desired_locations.clone(),
            remote_only: prefs.remote_only,
            min_salary: prefs.min_salary,
        }
    }

    /// Profile built straight from a fresh analysis, before any preferences exist.
    pub fn from_analysis(analysis: &ResumeAnalysis) -> Self {
        Self {
            skills: analysis.skills.clone(),
            desired_roles: analysis.preferred_roles.clone(),
            experience_level: Some(analysis.experience_level),
            desired_locations: Vec::new(),
            remote_only: true,
            min_salary: None,
        }
    }
}

/// Order-preserving, deduplicated concatenation.
fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for item in first.iter().chain(second) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}
