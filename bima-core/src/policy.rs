use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::profile::PlanType;

/// Upper bound on policies returned by one recommendation.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// A scored row of `insurance_policy_score_vw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub policy_id: String,
    pub company_name: String,
    pub policy_name: String,
    pub claim_settlement_ratio: f64,
    pub network_hospitals_count: i64,
    pub annual_premium: i64,
    /// Fraction of each claim paid by the insured, 0.0 to 1.0.
    pub co_payment: f64,
    pub pre_hospitalization_days: i32,
    pub post_hospitalization_days: i32,
    /// Composite suitability score, 0.0 to 1.0.
    pub total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_of_plan: Option<String>,
}

/// A row of `insurance_policy_features`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFeature {
    pub id: String,
    pub policy_id: String,
    pub feature_type: String,
    pub description: String,
    pub is_optional: bool,
    pub included: bool,
}

/// Filter for the scored-policy view.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyQuery {
    pub plan_type: PlanType,
    pub max_premium: Option<u64>,
    pub limit: usize,
}

impl PolicyQuery {
    pub fn new(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            max_premium: None,
            limit: MAX_RECOMMENDATIONS,
        }
    }

    pub fn with_max_premium(mut self, max_premium: u64) -> Self {
        self.max_premium = Some(max_premium);
        self
    }

    pub fn matches(&self, policy: &InsurancePolicy) -> bool {
        let type_matches = policy.type_of_plan.as_deref() == Some(self.plan_type.as_str());
        let within_budget = self
            .max_premium
            .is_none_or(|max| policy.annual_premium <= i64::try_from(max).unwrap_or(i64::MAX));
        type_matches && within_budget
    }
}

/// Read-only access to the policy catalogue.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Policies matching `query`, best `total_score` first, at most `query.limit`.
    async fn top_policies(&self, query: &PolicyQuery) -> Result<Vec<InsurancePolicy>>;

    async fn policy_features(&self, policy_id: &str) -> Result<Vec<PolicyFeature>>;
}

/// In-memory implementation of PolicyStore
#[derive(Default)]
pub struct InMemoryPolicyStore {
    policies: Arc<DashMap<String, InsurancePolicy>>,
    features: Arc<DashMap<String, Vec<PolicyFeature>>>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_policy(&self, policy: InsurancePolicy) {
        self.policies.insert(policy.policy_id.clone(), policy);
    }

    pub fn insert_features(&self, policy_id: impl Into<String>, features: Vec<PolicyFeature>) {
        self.features.insert(policy_id.into(), features);
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn top_policies(&self, query: &PolicyQuery) -> Result<Vec<InsurancePolicy>> {
        let mut matching: Vec<InsurancePolicy> = self
            .policies
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        matching.truncate(query.limit);
        Ok(matching)
    }

    async fn policy_features(&self, policy_id: &str) -> Result<Vec<PolicyFeature>> {
        Ok(self
            .features
            .get(policy_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}
