use async_trait::async_trait;
use bima_core::{AdapterError, InsurancePolicy, PolicyFeature, PolicyQuery, PolicyStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

type PolicyRow = (
    String,
    String,
    String,
    f64,
    i64,
    i64,
    f64,
    i32,
    i32,
    f64,
    Option<String>,
);

type FeatureRow = (String, String, String, String, bool, bool);

/// Direct PostgreSQL access to the scored policy view.
pub struct PostgresPolicyStore {
    pool: PgPool,
}

impl PostgresPolicyStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        info!("Connected to policy database");
        Ok(Self { pool })
    }
}

fn store_error(e: sqlx::Error) -> AdapterError {
    AdapterError::Store(e.to_string())
}

#[async_trait]
impl PolicyStore for PostgresPolicyStore {
    async fn top_policies(&self, query: &PolicyQuery) -> bima_core::Result<Vec<InsurancePolicy>> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            "SELECT policy_id::text, company_name, policy_name,                    \
                    claim_settlement_ratio::float8, network_hospitals_count::int8,  \
                    annual_premium::int8, co_payment::float8,                       \
                    pre_hospitalization_days::int4, post_hospitalization_days::int4,\
                    total_score::float8, type_of_plan                               \
             FROM insurance_policy_score_vw                                        \
             WHERE type_of_plan = $1                                               \
               AND ($2::int8 IS NULL OR annual_premium <= $2)                      \
             ORDER BY total_score DESC                                             \
             LIMIT $3",
        )
        .bind(query.plan_type.as_str())
        .bind(query.max_premium.map(|max| i64::try_from(max).unwrap_or(i64::MAX)))
        .bind(query.limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    policy_id,
                    company_name,
                    policy_name,
                    claim_settlement_ratio,
                    network_hospitals_count,
                    annual_premium,
                    co_payment,
                    pre_hospitalization_days,
                    post_hospitalization_days,
                    total_score,
                    type_of_plan,
                )| InsurancePolicy {
                    policy_id,
                    company_name,
                    policy_name,
                    claim_settlement_ratio,
                    network_hospitals_count,
                    annual_premium,
                    co_payment,
                    pre_hospitalization_days,
                    post_hospitalization_days,
                    total_score,
                    type_of_plan,
                },
            )
            .collect())
    }

    async fn policy_features(&self, policy_id: &str) -> bima_core::Result<Vec<PolicyFeature>> {
        let rows = sqlx::query_as::<_, FeatureRow>(
            "SELECT id::text, policy_id::text, feature_type, description, is_optional, included \
             FROM insurance_policy_features                                                    \
             WHERE policy_id::text = $1",
        )
        .bind(policy_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(id, policy_id, feature_type, description, is_optional, included)| PolicyFeature {
                    id,
                    policy_id,
                    feature_type,
                    description,
                    is_optional,
                    included,
                },
            )
            .collect())
    }
}
