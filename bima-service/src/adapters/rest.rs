use async_trait::async_trait;
use bima_core::{AdapterError, InsurancePolicy, PolicyFeature, PolicyQuery, PolicyStore};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SupabaseConfig;

/// Policy store backed by a Supabase project's PostgREST endpoint.
pub struct RestPolicyStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

// PostgREST renders numeric columns as floats.
#[derive(Debug, Deserialize)]
struct PolicyRow {
    policy_id: String,
    company_name: String,
    policy_name: String,
    claim_settlement_ratio: f64,
    network_hospitals_count: f64,
    annual_premium: f64,
    co_payment: f64,
    pre_hospitalization_days: f64,
    post_hospitalization_days: f64,
    total_score: f64,
    #[serde(default)]
    type_of_plan: Option<String>,
}

impl From<PolicyRow> for InsurancePolicy {
    fn from(row: PolicyRow) -> Self {
        Self {
            policy_id: row.policy_id,
            company_name: row.company_name,
            policy_name: row.policy_name,
            claim_settlement_ratio: row.claim_settlement_ratio,
            network_hospitals_count: row.network_hospitals_count.round() as i64,
            annual_premium: row.annual_premium.round() as i64,
            co_payment: row.co_payment,
            pre_hospitalization_days: row.pre_hospitalization_days.round() as i32,
            post_hospitalization_days: row.post_hospitalization_days.round() as i32,
            total_score: row.total_score,
            type_of_plan: row.type_of_plan,
        }
    }
}

/// Key columns may be uuid/text or serial/bigint depending on the schema.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(i64),
}

impl From<RowId> for String {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Text(text) => text,
            RowId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureRow {
    id: RowId,
    policy_id: RowId,
    #[serde(default)]
    feature_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_optional: bool,
    #[serde(default)]
    included: bool,
}

impl From<FeatureRow> for PolicyFeature {
    fn from(row: FeatureRow) -> Self {
        Self {
            id: row.id.into(),
            policy_id: row.policy_id.into(),
            feature_type: row.feature_type,
            description: row.description,
            is_optional: row.is_optional,
            included: row.included,
        }
    }
}

fn policy_params(query: &PolicyQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("type_of_plan", format!("eq.{}", query.plan_type.as_str())),
    ];
    if let Some(max) = query.max_premium {
        params.push(("annual_premium", format!("lte.{max}")));
    }
    params.push(("order", "total_score.desc".to_string()));
    params.push(("limit", query.limit.to_string()));
    params
}

impl RestPolicyStore {
    pub fn new(http: reqwest::Client, config: &SupabaseConfig) -> Self {
        Self {
            http,
            base_url: format!("{}/rest/v1", config.url),
            anon_key: config.anon_key.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&'static str, String)],
    ) -> bima_core::Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!(resource, "Querying policy store");

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(params)
            .send()
            .await
            .map_err(|e| AdapterError::Store(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Store(format!("{resource} returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| AdapterError::Store(format!("{resource} returned malformed rows: {e}")))
    }
}

#[async_trait]
impl PolicyStore for RestPolicyStore {
    async fn top_policies(&self, query: &PolicyQuery) -> bima_core::Result<Vec<InsurancePolicy>> {
        let rows: Vec<PolicyRow> = self
            .get("insurance_policy_score_vw", &policy_params(query))
            .await?;
        Ok(rows.into_iter().map(InsurancePolicy::from).collect())
    }

    async fn policy_features(&self, policy_id: &str) -> bima_core::Result<Vec<PolicyFeature>> {
        let params = [
            ("select", "*".to_string()),
            ("policy_id", format!("eq.{policy_id}")),
        ];
        let rows: Vec<FeatureRow> = self.get("insurance_policy_features", &params).await?;
        Ok(rows.into_iter().map(PolicyFeature::from).collect())
    }
}
