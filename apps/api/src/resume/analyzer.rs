//! Resume Analyzer: turns raw resume text into a structured profile.
//!
//! Pure and total: any text in, a `ResumeAnalysis` out. File decoding lives in
//! `resume::extract`.
//!
//! Algorithm:
//! 1. Lowercase and tokenize.
//! 2. Skills: single-word vocabulary terms must appear as tokens, multi-word
//!    terms as substrings of the lowercased text.
//! 3. Roles: categories with ≥2 keyword hits, ranked by hit count, top 3.
//! 4. Seniority: first band with a keyword hit, default mid.
//! 5. An explicit "N years of experience" overrides seniority.
//! 6. Important keywords: TF-IDF top 50, vocabulary terms longer than 2 chars, top 20.
//! 7. Potential titles: word runs ending in a job-title noun (original case).
//!    A run may cross line breaks, so a name line can fuse with the title below.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::job::ExperienceLevel;
use crate::models::user::StoredResumeAnalysis;
use crate::resume::tfidf::{TermScore, TfIdf};
use crate::resume::tokenizer::tokenize;
use crate::resume::vocabulary::{
    is_tech_skill, MIN_ROLE_HITS, ROLE_KEYWORDS, SENIORITY_KEYWORDS, TECH_SKILLS,
};

const MAX_PREFERRED_ROLES: usize = 3;
const TFIDF_CANDIDATES: usize = 50;
const MAX_IMPORTANT_KEYWORDS: usize = 20;
const MAX_POTENTIAL_TITLES: usize = 5;

static YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\+?\s*years?\s*(of)?\s*(experience|exp)").expect("valid years regex")
});

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|\n)\s*([A-Za-z0-9_\s]+(?:developer|engineer|designer|manager|analyst|scientist|architect|lead|admin|administrator|specialist|consultant))",
    )
    .expect("valid title regex")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub skills: Vec<String>,
    pub skill_count: usize,
    pub preferred_roles: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: Option<u32>,
    pub important_keywords: Vec<TermScore>,
    pub potential_titles: Vec<String>,
    pub raw_text_length: usize,
    pub word_count: usize,
}

impl ResumeAnalysis {
    /// The subset persisted against a user after an upload.
    pub fn to_stored(&self, resume_file_name: Option<String>) -> StoredResumeAnalysis {
        StoredResumeAnalysis {
            skills: self.skills.clone(),
            preferred_roles: self.preferred_roles.clone(),
            experience_level: Some(self.experience_level),
            years_of_experience: self.years_of_experience,
            potential_titles: self.potential_titles.clone(),
            resume_file_name,
            analyzed_at: Some(chrono::Utc::now()),
        }
    }
}

pub fn analyze_resume_text(text: &str) -> ResumeAnalysis {
    let normalized = text.to_lowercase();
    let words = tokenize(&normalized);

    let skills = extract_skills(&normalized, &words);
    let preferred_roles = infer_roles(&normalized);
    let years_of_experience = extract_years(&normalized);
    let experience_level = years_of_experience
        .map(ExperienceLevel::from_years)
        .unwrap_or_else(|| infer_seniority(&normalized));
    let important_keywords = rank_keywords(&normalized);
    let potential_titles = extract_titles(text);

    debug!(
        skills = skills.len(),
        roles = ?preferred_roles,
        level = experience_level.as_str(),
        "Analyzed resume text"
    );

    ResumeAnalysis {
        skill_count: skills.len(),
        skills,
        preferred_roles,
        experience_level,
        years_of_experience,
        important_keywords,
        potential_titles,
        raw_text_length: text.chars().count(),
        word_count: words.len(),
    }
}

/// Flat, deduplicated keyword list for building a job search query.
pub fn generate_search_keywords(analysis: &ResumeAnalysis) -> Vec<String> {
    let mut seen = HashSet::new();
    analysis
        .skills
        .iter()
        .chain(analysis.preferred_roles.iter())
        .chain(analysis.important_keywords.iter().map(|kw| &kw.term))
        .filter(|kw| seen.insert(kw.as_str()))
        .cloned()
        .collect()
}

fn extract_skills(normalized: &str, words: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut skills = Vec::new();

    for word in words {
        if is_tech_skill(word) && seen.insert(word.as_str()) {
            skills.push(word.clone());
        }
    }

    for &skill in TECH_SKILLS.iter().filter(|s| s.contains(' ')) {
        if normalized.contains(skill) && seen.insert(skill) {
            skills.push(skill.to_string());
        }
    }

    skills
}

fn infer_roles(normalized: &str) -> Vec<String> {
    let mut detected: Vec<(&str, usize)> = ROLE_KEYWORDS
        .iter()
        .map(|(role, keywords)| {
            let hits = keywords.iter().filter(|kw| normalized.contains(*kw)).count();
            (*role, hits)
        })
        .filter(|(_, hits)| *hits >= MIN_ROLE_HITS)
        .collect();

    detected.sort_by(|a, b| b.1.cmp(&a.1));
    detected
        .into_iter()
        .take(MAX_PREFERRED_ROLES)
        .map(|(role, _)| role.to_string())
        .collect()
}

fn infer_seniority(normalized: &str) -> ExperienceLevel {
    SENIORITY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| normalized.contains(kw)))
        .map(|(level, _)| *level)
        .unwrap_or(ExperienceLevel::Mid)
}

fn extract_years(normalized: &str) -> Option<u32> {
    let captures = YEARS_PATTERN.captures(normalized)?;
    let digits = captures.get(1)?.as_str();
    // Absurdly long digit runs still mean "a lot of experience".
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

fn rank_keywords(normalized: &str) -> Vec<TermScore> {
    let mut index = TfIdf::new();
    index.add_document(normalized);

    index
        .list_terms(0)
        .into_iter()
        .take(TFIDF_CANDIDATES)
        .filter(|t| t.term.chars().count() > 2 && is_tech_skill(&t.term))
        .take(MAX_IMPORTANT_KEYWORDS)
        .collect()
}

fn extract_titles(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TITLE_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| {
            let len = title.chars().count();
            len > 5 && len < 50
        })
        .filter(|title| seen.insert(title.clone()))
        .take(MAX_POTENTIAL_TITLES)
        .collect()
}
