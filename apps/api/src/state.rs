use std::sync::Arc;

use crate::config::Config;
use crate::matching::scoring::SkillMatchMode;
use crate::matching::JobMatcher;
use crate::store::{InteractionStore, JobStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Postgres-backed in production, in-memory in tests.
    pub jobs: Arc<dyn JobStore>,
    pub users: Arc<dyn UserStore>,
    pub interactions: Arc<dyn InteractionStore>,
}

impl AppState {
    /// A matcher over the shared stores, configured from `Config`.
    pub fn matcher(&self) -> JobMatcher {
        JobMatcher::new(
            self.jobs.clone(),
            self.users.clone(),
            self.interactions.clone(),
        )
        .with_candidate_limits(
            self.config.match_candidate_limit,
            self.config.resume_candidate_limit,
        )
        .with_skill_match(SkillMatchMode::from_strict(self.config.strict_skill_match))
    }
}
