//! Selection: turns a scored candidate pool into the list a user sees.
//!
//! YC postings and everything else are picked from separate buckets, so YC jobs
//! always get a slot. Free plans get a fixed 5 + 5; paid plans are topped up
//! with random fillers until the requested limit.
//!
//! All randomness comes from the caller's `Rng`.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::matching::scoring::MatchDetails;
use crate::models::job::{JobId, JobRecord};
use crate::models::user::SubscriptionPlan;

pub const YC_MIN_SCORE: u32 = 10;
pub const YC_PICKS: usize = 5;
pub const OTHER_PICKS: usize = 5;
pub const OTHER_SAMPLE_POOL: usize = 50;
pub const MAX_JITTER: u32 = 4;

/// A job decorated with its score, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedJob {
    #[serde(flatten)]
    pub job: JobRecord,
    pub match_score: u32,
    pub match_details: MatchDetails,
}

#[derive(Debug, Clone, Copy)]
pub struct SelectionParams {
    pub min_score: u32,
    pub limit: usize,
    pub plan: SubscriptionPlan,
}

/// Adds 0..=MAX_JITTER to a score, capped at 100.
pub fn apply_jitter<R: Rng>(score: u32, rng: &mut R) -> u32 {
    (score + rng.gen_range(0..=MAX_JITTER)).min(100)
}

pub fn select_matches<R: Rng>(
    scored: &[MatchedJob],
    params: SelectionParams,
    rng: &mut R,
) -> Vec<MatchedJob> {
    let (yc, other): (Vec<&MatchedJob>, Vec<&MatchedJob>) =
        scored.iter().partition(|m| m.job.is_ycombinator());

    let mut yc: Vec<&MatchedJob> = yc
        .into_iter()
        .filter(|m| m.match_score >= YC_MIN_SCORE)
        .collect();
    yc.sort_by(|a, b| {
        b.job
            .has_founders()
            .cmp(&a.job.has_founders())
            .then(b.match_score.cmp(&a.match_score))
    });
    yc.truncate(YC_PICKS);
    yc.shuffle(rng);

    let mut other: Vec<&MatchedJob> = other
        .into_iter()
        .filter(|m| m.match_score >= params.min_score)
        .collect();
    other.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    other.truncate(OTHER_SAMPLE_POOL);
    other.shuffle(rng);
    other.truncate(OTHER_PICKS);

    debug!(
        yc = yc.len(),
        other = other.len(),
        pool = scored.len(),
        "Selected tiered matches"
    );

    let mut selected: Vec<MatchedJob> = yc.into_iter().chain(other).cloned().collect();

    if !params.plan.is_premium() || selected.len() >= params.limit {
        return selected;
    }

    let taken: HashSet<JobId> = selected.iter().map(|m| m.job.id).collect();
    let mut fillers: Vec<&MatchedJob> = scored
        .iter()
        .filter(|m| !taken.contains(&m.job.id))
        .collect();
    fillers.shuffle(rng);
    fillers.truncate(params.limit - selected.len());
    selected.extend(fillers.into_iter().cloned());

    selected
}
