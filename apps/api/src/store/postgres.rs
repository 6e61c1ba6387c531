use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::job::{JobId, JobRecord, JobRow};
use crate::models::user::{Preferences, StoredResumeAnalysis, UserRecord, UserRow};
use crate::store::{search_terms, InteractionStore, JobQuery, JobSort, JobStore, UserStore};

const JOB_COLUMNS: &str = "id, title, description, company_name, company_website, company_yc_batch, \
     tags, skills, location, location_type, experience_level, salary_min, salary_max, \
     salary_currency, salary_period, source, apply_url, founders, status, featured, scraped_at";

/// Job store over the `jobs` table. Text search uses the `search_vector` column.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// OR-semantics tsquery: any keyword may match.
fn to_tsquery(text: &str) -> Option<String> {
    let terms = search_terms(text);
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" | "))
    }
}

fn push_conditions<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    query: &'a JobQuery,
    tsquery: Option<&'a String>,
) {
    qb.push(" WHERE status = 'active'");

    if let Some(source) = &query.filter.source {
        qb.push(" AND source = ").push_bind(source);
    }
    if let Some(location_type) = query.filter.location_type {
        qb.push(" AND location_type = ").push_bind(location_type.as_str());
    }
    if let Some(level) = query.filter.experience_level {
        qb.push(" AND experience_level = ").push_bind(level.as_str());
    }
    if !query.exclude_ids.is_empty() {
        qb.push(" AND NOT (id = ANY(")
            .push_bind(&query.exclude_ids)
            .push("))");
    }
    if let Some(tsquery) = tsquery {
        qb.push(" AND search_vector @@ to_tsquery('english', ")
            .push_bind(tsquery)
            .push(")");
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_active(&self, query: &JobQuery) -> Result<Vec<JobRecord>> {
        let tsquery = query.text_search.as_deref().and_then(to_tsquery);

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        push_conditions(&mut qb, query, tsquery.as_ref());

        match (query.sort, tsquery.as_ref()) {
            (JobSort::FeaturedThenRecent, _) => {
                qb.push(" ORDER BY featured DESC, scraped_at DESC");
            }
            (JobSort::TextScore, Some(tsquery)) => {
                qb.push(" ORDER BY ts_rank(search_vector, to_tsquery('english', ")
                    .push_bind(tsquery)
                    .push(")) DESC, scraped_at DESC");
            }
            (JobSort::Recent, _) | (JobSort::TextScore, None) => {
                qb.push(" ORDER BY scraped_at DESC");
            }
        }

        qb.push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.skip);

        let rows = qb
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(JobRecord::from).collect())
    }

    async fn count_active(&self, query: &JobQuery) -> Result<u64> {
        let tsquery = query.text_search.as_deref().and_then(to_tsquery);

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_conditions(&mut qb, query, tsquery.as_ref());

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, plan, preferences, resume_analysis FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    async fn save_resume_analysis(
        &self,
        user_id: Uuid,
        preferences: &Preferences,
        analysis: &StoredResumeAnalysis,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users SET preferences = $1, resume_analysis = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(Json(preferences))
        .bind(Json(analysis))
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        info!("Stored resume analysis for user {user_id}");
        Ok(())
    }

    async fn clear_resume_analysis(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET resume_analysis = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn seen_job_ids(&self, user_id: Uuid) -> Result<HashSet<JobId>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT DISTINCT job_id FROM saved_jobs WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().collect())
    }
}
