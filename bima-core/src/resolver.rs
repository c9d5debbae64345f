//! Plan resolution: classify the applicant, ask the store for the best-scored
//! policies, relax the budget when nothing fits, and fall back to the local
//! catalogue when the store is empty, failing, or absent.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{AdapterError, Result};
use crate::fallback::{fallback_features, fallback_policies};
use crate::policy::{InsurancePolicy, MAX_RECOMMENDATIONS, PolicyFeature, PolicyQuery, PolicyStore};
use crate::profile::{PlanType, ProfileForm, UserProfile};

/// Timeout and retry budget for a single store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retries: 1,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Run `call` under the timeout, retrying up to `retries` times after a fixed backoff.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.timeout, call()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AdapterError::Timeout {
                    operation,
                    elapsed: self.timeout,
                }),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(operation, attempt, error = %e, "Store call failed, retrying");
                    tokio::time::sleep(self.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySource {
    Store,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPolicy {
    /// 1-based position in the recommendation.
    pub rank: usize,
    pub policy: InsurancePolicy,
    pub features: Vec<PolicyFeature>,
    pub source: PolicySource,
}

pub struct Resolver {
    store: Option<Arc<dyn PolicyStore>>,
    retry: RetryPolicy,
}

impl Resolver {
    pub fn new(store: Option<Arc<dyn PolicyStore>>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Validate and resolve. An invalid form yields an empty list so callers can
    /// show a "cannot compute" state.
    pub async fn recommend(&self, form: &ProfileForm) -> Vec<RankedPolicy> {
        match form.validate() {
            Ok(profile) => self.resolve(&profile).await,
            Err(e) => {
                warn!(error = %e, "Rejecting recommendation request");
                Vec::new()
            }
        }
    }

    /// Never empty: falls back to the local catalogue when the store can't answer.
    pub async fn resolve(&self, profile: &UserProfile) -> Vec<RankedPolicy> {
        let plan_type = profile.plan_type();
        info!(
            plan_type = %plan_type,
            budget = profile.budget,
            "Resolving insurance plans"
        );

        let (mut policies, source) = self.find_policies(plan_type, profile.budget).await;
        policies.truncate(MAX_RECOMMENDATIONS);

        let mut ranked = Vec::with_capacity(policies.len());
        for (index, policy) in policies.into_iter().enumerate() {
            let features = self.features_for(&policy.policy_id).await;
            ranked.push(RankedPolicy {
                rank: index + 1,
                policy,
                features,
                source,
            });
        }
        ranked
    }

    async fn find_policies(
        &self,
        plan_type: PlanType,
        budget: u64,
    ) -> (Vec<InsurancePolicy>, PolicySource) {
        let fallback = || (fallback_policies(plan_type, budget), PolicySource::Fallback);

        let Some(store) = self.store.as_deref() else {
            info!("No policy store configured, returning fallback plans");
            return fallback();
        };

        let within_budget = PolicyQuery::new(plan_type).with_max_premium(budget);
        match self
            .retry
            .run("top_policies", || store.top_policies(&within_budget))
            .await
        {
            Ok(found) if !found.is_empty() => {
                info!(count = found.len(), "Fetched top insurance plans");
                return (found, PolicySource::Store);
            }
            Ok(_) => info!("No results with plan type and budget, trying without budget"),
            Err(e) => {
                error!(error = %e, "Error fetching plans");
                return fallback();
            }
        }

        let any_budget = PolicyQuery::new(plan_type);
        match self
            .retry
            .run("top_policies", || store.top_policies(&any_budget))
            .await
        {
            Ok(found) if !found.is_empty() => {
                info!(count = found.len(), "Fallback plans returned from store");
                (found, PolicySource::Store)
            }
            Ok(_) => {
                info!("No plans found in the store, returning fallback plans");
                fallback()
            }
            Err(e) => {
                error!(error = %e, "Error in budget-free plan fetch");
                fallback()
            }
        }
    }

    async fn features_for(&self, policy_id: &str) -> Vec<PolicyFeature> {
        let Some(store) = self.store.as_deref() else {
            return fallback_features(policy_id);
        };

        // Fallback plans carry slug ids that the store can never know about.
        if Uuid::parse_str(policy_id).is_err() {
            info!(policy_id, "Non-UUID policy id, using generic features");
            return fallback_features(policy_id);
        }

        match self
            .retry
            .run("policy_features", || store.policy_features(policy_id))
            .await
        {
            Ok(features) if !features.is_empty() => features,
            Ok(_) => {
                info!(policy_id, "No features found for policy, using generic features");
                fallback_features(policy_id)
            }
            Err(e) => {
                error!(policy_id, error = %e, "Error fetching policy features");
                fallback_features(policy_id)
            }
        }
    }
}
