//! Collaborator seams: where jobs, users and interactions come from.
//!
//! The matcher only talks to these traits. `postgres` backs them in production,
//! `memory` backs them in tests.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::{ExperienceLevel, JobId, JobRecord, LocationType};
use crate::models::user::{Preferences, StoredResumeAnalysis, UserRecord};

/// Optional equality filters applied on top of `status = active`.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub source: Option<String>,
    pub location_type: Option<LocationType>,
    pub experience_level: Option<ExperienceLevel>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobSort {
    /// Featured first, then most recently scraped.
    FeaturedThenRecent,
    #[default]
    Recent,
    /// Full-text relevance; falls back to recency without a search term.
    TextScore,
}

#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub filter: JobFilter,
    /// Space-separated keywords, any of which may match.
    pub text_search: Option<String>,
    pub exclude_ids: Vec<JobId>,
    pub sort: JobSort,
    pub limit: i64,
    pub skip: i64,
}

impl JobQuery {
    pub fn active(sort: JobSort, limit: i64) -> Self {
        Self {
            sort,
            limit,
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Active jobs matching the query, already sorted and paginated.
    async fn find_active(&self, query: &JobQuery) -> Result<Vec<JobRecord>>;

    /// Number of active jobs matching the query's filter, search and exclusions.
    async fn count_active(&self, query: &JobQuery) -> Result<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>>;

    async fn save_resume_analysis(
        &self,
        user_id: Uuid,
        preferences: &Preferences,
        analysis: &StoredResumeAnalysis,
    ) -> Result<()>;

    async fn clear_resume_analysis(&self, user_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Ids of every job the user has liked, skipped, saved, applied to or hidden.
    async fn seen_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>>;
}

/// Splits free text into lowercase alphanumeric search terms.
pub fn search_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_strip_punctuation_and_dedupe() {
        let terms = search_terms("Node.js  react, React ci/cd");
        assert_eq!(terms, vec!["node", "js", "react", "ci", "cd"]);
    }

    #[test]
    fn test_search_terms_empty_input() {
        assert!(search_terms("  ,; ").is_empty());
    }
}
