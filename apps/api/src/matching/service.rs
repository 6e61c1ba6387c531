//! Job Matcher: the two matching entry points plus the profile update that
//! follows a resume upload.
//!
//! Request-scoped: built from `AppState` per call, holds only `Arc`s to the
//! stores and the configured candidate limits.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::profile::UserProfile;
use crate::matching::scoring::{score_job_with, SkillMatchMode};
use crate::matching::selection::{apply_jitter, select_matches, MatchedJob, SelectionParams};
use crate::models::job::JobRecord;
use crate::models::user::UserRecord;
use crate::resume::analyzer::ResumeAnalysis;
use crate::store::{InteractionStore, JobQuery, JobSort, JobStore, UserStore};

/// Skills taken from an analysis when building its search query.
const SEARCH_SKILLS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub limit: usize,
    pub min_score: u32,
    pub exclude_seen: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            limit: 15,
            min_score: 30,
            exclude_seen: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResumeMatchOptions {
    pub limit: usize,
    /// Drops candidates below this score when set.
    pub min_score: Option<u32>,
}

impl Default for ResumeMatchOptions {
    fn default() -> Self {
        Self {
            limit: 15,
            min_score: None,
        }
    }
}

#[derive(Clone)]
pub struct JobMatcher {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    interactions: Arc<dyn InteractionStore>,
    match_candidate_limit: i64,
    resume_candidate_limit: i64,
    skill_match: SkillMatchMode,
}

impl JobMatcher {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserStore>,
        interactions: Arc<dyn InteractionStore>,
    ) -> Self {
        Self {
            jobs,
            users,
            interactions,
            match_candidate_limit: 500,
            resume_candidate_limit: 200,
            skill_match: SkillMatchMode::Substring,
        }
    }

    pub fn with_candidate_limits(mut self, match_limit: i64, resume_limit: i64) -> Self {
        self.match_candidate_limit = match_limit;
        self.resume_candidate_limit = resume_limit;
        self
    }

    pub fn with_skill_match(mut self, mode: SkillMatchMode) -> Self {
        self.skill_match = mode;
        self
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<UserRecord, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Stored users
    // ────────────────────────────────────────────────────────────────────────

    /// Tiered, jittered matches for a stored user.
    pub async fn get_matched_jobs<R: Rng>(
        &self,
        user_id: Uuid,
        options: MatchOptions,
        rng: &mut R,
    ) -> Result<Vec<MatchedJob>, AppError> {
        let seen = async {
            if options.exclude_seen {
                Ok::<_, AppError>(self.interactions.seen_job_ids(user_id).await?)
            } else {
                Ok(HashSet::new())
            }
        };
        let (user, seen) = tokio::try_join!(self.find_user(user_id), seen)?;

        let profile = UserProfile::from_user(&user);

        let mut query = JobQuery::active(JobSort::FeaturedThenRecent, self.match_candidate_limit);
        query.exclude_ids = seen.into_iter().collect();
        let candidates = self.jobs.find_active(&query).await?;

        let scored: Vec<MatchedJob> = candidates
            .into_iter()
            .map(|job| {
                let mut matched = self.score(job, &profile);
                matched.match_score = apply_jitter(matched.match_score, rng);
                matched
            })
            .collect();

        let selected = select_matches(
            &scored,
            SelectionParams {
                min_score: options.min_score,
                limit: options.limit,
                plan: user.plan,
            },
            rng,
        );

        info!(
            %user_id,
            excluded = query.exclude_ids.len(),
            candidates = scored.len(),
            returned = selected.len(),
            "Matched jobs for user"
        );
        Ok(selected)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Fresh resume analysis
    // ────────────────────────────────────────────────────────────────────────

    /// Best matches for a fresh analysis, before any preferences are stored.
    /// Deterministic: no jitter, no tiering.
    pub async fn get_jobs_from_resume_analysis(
        &self,
        analysis: &ResumeAnalysis,
        options: ResumeMatchOptions,
    ) -> Result<Vec<MatchedJob>, AppError> {
        let profile = UserProfile::from_analysis(analysis);
        let candidates = self.resume_candidates(analysis).await?;

        let mut scored: Vec<MatchedJob> = candidates
            .into_iter()
            .map(|job| self.score(job, &profile))
            .filter(|m| options.min_score.map_or(true, |min| m.match_score >= min))
            .collect();
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(options.limit);

        debug!(returned = scored.len(), "Matched jobs for resume analysis");
        Ok(scored)
    }

    async fn resume_candidates(&self, analysis: &ResumeAnalysis) -> Result<Vec<JobRecord>, AppError> {
        let keywords = analysis
            .skills
            .iter()
            .take(SEARCH_SKILLS)
            .chain(&analysis.preferred_roles)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let recent = JobQuery::active(JobSort::Recent, self.resume_candidate_limit);
        if keywords.trim().is_empty() {
            return Ok(self.jobs.find_active(&recent).await?);
        }

        let mut search = JobQuery::active(JobSort::TextScore, self.resume_candidate_limit);
        search.text_search = Some(keywords);
        match self.jobs.find_active(&search).await {
            Ok(jobs) => Ok(jobs),
            Err(e) => {
                warn!(error = %e, "Job text search failed, falling back to recent jobs");
                Ok(self.jobs.find_active(&recent).await?)
            }
        }
    }

    fn score(&self, job: JobRecord, profile: &UserProfile) -> MatchedJob {
        let result = score_job_with(&job, profile, self.skill_match);
        MatchedJob {
            job,
            match_score: result.score,
            match_details: result.details,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Profile updates
    // ────────────────────────────────────────────────────────────────────────

    /// Merges an analysis into the user's preferences and stores it.
    /// Skills are unioned; roles and experience level are only filled when unset.
    pub async fn update_user_from_resume(
        &self,
        user_id: Uuid,
        analysis: &ResumeAnalysis,
        resume_file_name: Option<String>,
    ) -> Result<UserRecord, AppError> {
        let mut user = self.find_user(user_id).await?;
        let prefs = &mut user.preferences;

        for skill in &analysis.skills {
            if !prefs.skills.contains(skill) {
                prefs.skills.push(skill.clone());
            }
        }
        if prefs.desired_roles.is_empty() {
            prefs.desired_roles = analysis.preferred_roles.clone();
        }
        if prefs.experience_level.is_none() {
            prefs.experience_level = Some(analysis.experience_level);
        }

        let stored = analysis.to_stored(resume_file_name);
        self.users
            .save_resume_analysis(user_id, &user.preferences, &stored)
            .await?;
        user.resume_analysis = Some(stored);

        info!(%user_id, skills = user.preferences.skills.len(), "Updated user from resume");
        Ok(user)
    }

    pub async fn clear_resume(&self, user_id: Uuid) -> Result<(), AppError> {
        self.find_user(user_id).await?;
        self.users.clear_resume_analysis(user_id).await?;
        info!(%user_id, "Cleared resume analysis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{sample_job, ExperienceLevel, LocationType};
    use crate::models::user::{Preferences, StoredResumeAnalysis, SubscriptionPlan};
    use crate::resume::analyzer::analyze_resume_text;
    use crate::store::memory::{MemoryInteractionStore, MemoryJobStore, MemoryUserStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn python_job(title: &str, yc: bool) -> JobRecord {
        let mut job = sample_job(title);
        job.tags = vec!["python".to_string()];
        if yc {
            job.source = "YCombinator".to_string();
        }
        job
    }

    fn user(plan: SubscriptionPlan) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: "dev@example.com".to_string(),
            plan,
            preferences: Preferences {
                skills: vec!["python".to_string()],
                ..Default::default()
            },
            resume_analysis: None,
        }
    }

    fn matcher(
        jobs: MemoryJobStore,
        users: Arc<MemoryUserStore>,
        interactions: MemoryInteractionStore,
    ) -> JobMatcher {
        JobMatcher::new(Arc::new(jobs), users, Arc::new(interactions))
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let m = matcher(
            MemoryJobStore::default(),
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let err = m
            .get_matched_jobs(Uuid::new_v4(), MatchOptions::default(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_free_user_gets_ten_with_at_most_five_yc() {
        let jobs: Vec<JobRecord> = (0..8)
            .map(|i| python_job(&format!("YC {i}"), true))
            .chain((0..8).map(|i| python_job(&format!("Other {i}"), false)))
            .collect();
        let u = user(SubscriptionPlan::Free);
        let user_id = u.id;

        let m = matcher(
            MemoryJobStore::new(jobs),
            Arc::new(MemoryUserStore::with_users(vec![u])),
            MemoryInteractionStore::default(),
        );
        let matched = m
            .get_matched_jobs(user_id, MatchOptions::default(), &mut StdRng::seed_from_u64(2))
            .await
            .unwrap();

        assert_eq!(matched.len(), 10);
        assert!(matched.iter().filter(|j| j.job.is_ycombinator()).count() <= 5);
        assert!(matched.iter().all(|j| j.match_score >= 40 && j.match_score <= 44));
    }

    #[tokio::test]
    async fn test_seen_jobs_are_excluded() {
        let jobs: Vec<JobRecord> = (0..12).map(|i| python_job(&format!("Job {i}"), false)).collect();
        let seen: HashSet<Uuid> = jobs.iter().take(8).map(|j| j.id).collect();
        let u = user(SubscriptionPlan::Premium);
        let user_id = u.id;

        let mut interactions = MemoryInteractionStore::default();
        interactions.seen.insert(user_id, seen.clone());

        let m = matcher(
            MemoryJobStore::new(jobs),
            Arc::new(MemoryUserStore::with_users(vec![u])),
            interactions,
        );
        let matched = m
            .get_matched_jobs(user_id, MatchOptions::default(), &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(matched.len(), 4);
        assert!(matched.iter().all(|j| !seen.contains(&j.job.id)));

        let everything = m
            .get_matched_jobs(
                user_id,
                MatchOptions {
                    exclude_seen: false,
                    ..Default::default()
                },
                &mut StdRng::seed_from_u64(3),
            )
            .await
            .unwrap();
        assert_eq!(everything.len(), 12);
    }

    #[tokio::test]
    async fn test_premium_user_is_filled_to_limit() {
        let mut jobs: Vec<JobRecord> = (0..3).map(|i| python_job(&format!("Fit {i}"), false)).collect();
        jobs.extend((0..20).map(|i| sample_job(&format!("Unrelated {i}"))));
        let u = user(SubscriptionPlan::Premium);
        let user_id = u.id;

        let m = matcher(
            MemoryJobStore::new(jobs),
            Arc::new(MemoryUserStore::with_users(vec![u])),
            MemoryInteractionStore::default(),
        );
        let matched = m
            .get_matched_jobs(
                user_id,
                MatchOptions {
                    limit: 12,
                    ..Default::default()
                },
                &mut StdRng::seed_from_u64(4),
            )
            .await
            .unwrap();
        assert_eq!(matched.len(), 12);
    }

    #[tokio::test]
    async fn test_resume_matches_sorted_and_limited() {
        let mut strong = python_job("Senior Backend Engineer", false);
        strong.tags.push("django".to_string());
        strong.experience_level = Some(ExperienceLevel::Senior);
        strong.location_type = Some(LocationType::Remote);
        let strong_id = strong.id;

        let mut jobs = vec![python_job("Python Developer", false), strong];
        jobs.extend((0..5).map(|i| python_job(&format!("Backend {i}"), false)));

        let m = matcher(
            MemoryJobStore::new(jobs),
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text(
            "Senior backend engineer, 6 years of experience with Python, Django and REST APIs on a server",
        );
        let matched = m
            .get_jobs_from_resume_analysis(
                &analysis,
                ResumeMatchOptions {
                    limit: 3,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(matched.len(), 3);
        assert_eq!(matched[0].job.id, strong_id);
        assert!(matched.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[tokio::test]
    async fn test_resume_search_finds_jobs_by_tag() {
        let mut tagged = sample_job("Platform Role");
        tagged.tags = vec!["kafka".to_string()];

        let m = matcher(
            MemoryJobStore::new(vec![sample_job("Office Manager"), tagged]),
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text("kafka kafka streams");
        let matched = m
            .get_jobs_from_resume_analysis(&analysis, ResumeMatchOptions::default())
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].job.title, "Platform Role");
    }

    #[tokio::test]
    async fn test_resume_search_failure_falls_back_to_recent() {
        let mut store = MemoryJobStore::new(vec![sample_job("Office Manager"), python_job("Data Engineer", false)]);
        store.fail_text_search = true;

        let m = matcher(
            store,
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text("python python python");
        let matched = m
            .get_jobs_from_resume_analysis(&analysis, ResumeMatchOptions::default())
            .await
            .unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].job.title, "Data Engineer");
    }

    #[tokio::test]
    async fn test_resume_without_keywords_uses_recent_jobs() {
        let m = matcher(
            MemoryJobStore::new(vec![sample_job("Chef"), sample_job("Barista")]),
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text("");
        let matched = m
            .get_jobs_from_resume_analysis(&analysis, ResumeMatchOptions::default())
            .await
            .unwrap();
        assert_eq!(matched.len(), 2);
    }

    #[tokio::test]
    async fn test_resume_min_score_filters_when_given() {
        let m = matcher(
            MemoryJobStore::new(vec![sample_job("Python Tutor"), python_job("Python Developer", false)]),
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text("python developer");
        let matched = m
            .get_jobs_from_resume_analysis(
                &analysis,
                ResumeMatchOptions {
                    limit: 15,
                    min_score: Some(20),
                },
            )
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].job.title, "Python Developer");
    }

    #[tokio::test]
    async fn test_update_user_from_resume_merges_preferences() {
        let mut u = user(SubscriptionPlan::Free);
        u.preferences.desired_roles = vec!["platform".to_string()];
        let user_id = u.id;
        let users = Arc::new(MemoryUserStore::with_users(vec![u]));

        let m = matcher(
            MemoryJobStore::default(),
            users.clone(),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text(
            "Backend developer with an API server, Python and Docker. 3 years of experience",
        );
        m.update_user_from_resume(user_id, &analysis, Some("cv.pdf".to_string()))
            .await
            .unwrap();

        let stored = users.get(user_id).unwrap();
        assert_eq!(stored.preferences.skills[0], "python");
        assert!(stored.preferences.skills.contains(&"docker".to_string()));
        assert_eq!(stored.preferences.desired_roles, vec!["platform"]);
        assert_eq!(stored.preferences.experience_level, Some(ExperienceLevel::Mid));

        let resume: &StoredResumeAnalysis = stored.resume_analysis.as_ref().unwrap();
        assert_eq!(resume.years_of_experience, Some(3));
        assert_eq!(resume.resume_file_name.as_deref(), Some("cv.pdf"));
        assert!(resume.analyzed_at.is_some());
        assert!(stored.has_resume());
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let m = matcher(
            MemoryJobStore::default(),
            Arc::new(MemoryUserStore::default()),
            MemoryInteractionStore::default(),
        );
        let analysis = analyze_resume_text("python");
        let err = m
            .update_user_from_resume(Uuid::new_v4(), &analysis, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_clear_resume() {
        let mut u = user(SubscriptionPlan::Free);
        u.resume_analysis = Some(StoredResumeAnalysis {
            skills: vec!["python".to_string()],
            ..Default::default()
        });
        let user_id = u.id;
        let users = Arc::new(MemoryUserStore::with_users(vec![u]));

        let m = matcher(MemoryJobStore::default(), users.clone(), MemoryInteractionStore::default());
        m.clear_resume(user_id).await.unwrap();
        assert!(!users.get(user_id).unwrap().has_resume());
    }
}
