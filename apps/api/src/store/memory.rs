//! In-memory stores for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::{JobId, JobRecord};
use crate::models::user::{Preferences, StoredResumeAnalysis, UserRecord};
use crate::store::{search_terms, InteractionStore, JobQuery, JobSort, JobStore, UserStore};

#[derive(Default)]
pub struct MemoryJobStore {
    pub jobs: Vec<JobRecord>,
    /// Simulates a store without a usable text index.
    pub fail_text_search: bool,
}

impl MemoryJobStore {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs,
            fail_text_search: false,
        }
    }

    /// Searches the same fields as the `jobs.search_vector` column.
    fn text_hits(job: &JobRecord, terms: &[String]) -> usize {
        let mut haystack = job.title.to_lowercase();
        if let Some(company) = &job.company {
            haystack.push(' ');
            haystack.push_str(&company.name.to_lowercase());
        }
        haystack.push(' ');
        haystack.push_str(&job.tags.join(" ").to_lowercase());
        if let Some(description) = &job.description {
            haystack.push(' ');
            haystack.push_str(&description.to_lowercase());
        }
        let words: HashSet<String> = search_terms(&haystack).into_iter().collect();
        terms.iter().filter(|t| words.contains(*t)).count()
    }

    fn matching(&self, query: &JobQuery) -> Result<Vec<(usize, &JobRecord)>> {
        let terms = query.text_search.as_deref().map(search_terms);
        if terms.is_some() && self.fail_text_search {
            return Err(anyhow!("text index not available"));
        }

        Ok(self
            .jobs
            .iter()
            .filter(|job| job.is_active())
            .filter(|job| !query.exclude_ids.contains(&job.id))
            .filter(|job| {
                query
                    .filter
                    .source
                    .as_ref()
                    .map_or(true, |source| &job.source == source)
            })
            .filter(|job| {
                query
                    .filter
                    .location_type
                    .map_or(true, |lt| job.location_type == Some(lt))
            })
            .filter(|job| {
                query
                    .filter
                    .experience_level
                    .map_or(true, |level| job.experience_level == Some(level))
            })
            .filter_map(|job| match &terms {
                Some(terms) if !terms.is_empty() => {
                    let hits = Self::text_hits(job, terms);
                    (hits > 0).then_some((hits, job))
                }
                _ => Some((0, job)),
            })
            .collect())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find_active(&self, query: &JobQuery) -> Result<Vec<JobRecord>> {
        let mut found = self.matching(query)?;
        match query.sort {
            JobSort::FeaturedThenRecent => found.sort_by(|(_, a), (_, b)| {
                b.featured
                    .cmp(&a.featured)
                    .then(b.scraped_at.cmp(&a.scraped_at))
            }),
            JobSort::TextScore => found.sort_by(|(ha, a), (hb, b)| {
                hb.cmp(ha).then(b.scraped_at.cmp(&a.scraped_at))
            }),
            JobSort::Recent => found.sort_by(|(_, a), (_, b)| b.scraped_at.cmp(&a.scraped_at)),
        }
        Ok(found
            .into_iter()
            .skip(query.skip.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .map(|(_, job)| job.clone())
            .collect())
    }

    async fn count_active(&self, query: &JobQuery) -> Result<u64> {
        Ok(self.matching(query)?.len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    pub users: Mutex<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub fn get(&self, user_id: Uuid) -> Option<UserRecord> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.get(user_id))
    }

    async fn save_resume_analysis(
        &self,
        user_id: Uuid,
        preferences: &Preferences,
        analysis: &StoredResumeAnalysis,
    ) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} vanished"))?;
        user.preferences = preferences.clone();
        user.resume_analysis = Some(analysis.clone());
        Ok(())
    }

    async fn clear_resume_analysis(&self, user_id: Uuid) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.resume_analysis = None;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryInteractionStore {
    pub seen: HashMap<Uuid, HashSet<JobId>>,
}

#[async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn seen_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>> {
        Ok(self.seen.get(&user_id).cloned().unwrap_or_default())
    }
}
