//! Locally synthesized catalogue used whenever the policy store cannot answer.

use crate::policy::{InsurancePolicy, PolicyFeature};
use crate::profile::PlanType;

struct Template {
    id: &'static str,
    company: &'static str,
    name: &'static str,
    csr: f64,
    hospitals: i64,
    /// Amount subtracted from the budget before applying `cap`.
    budget_offset: i64,
    cap: i64,
    co_payment: f64,
    pre_days: i32,
    post_days: i32,
    score: f64,
}

const SENIOR: [Template; 2] = [
    Template {
        id: "senior-care-plus",
        company: "ABC Health Insurance",
        name: "Senior Care Plus",
        csr: 96.0,
        hospitals: 5000,
        budget_offset: 0,
        cap: 12_000,
        co_payment: 0.1,
        pre_days: 60,
        post_days: 90,
        score: 0.95,
    },
    Template {
        id: "senior-shield",
        company: "XYZ Insurance",
        name: "Senior Shield",
        csr: 94.0,
        hospitals: 4500,
        budget_offset: 2_000,
        cap: 10_000,
        co_payment: 0.15,
        pre_days: 45,
        post_days: 60,
        score: 0.88,
    },
];

const FAMILY: [Template; 2] = [
    Template {
        id: "family-floater-gold",
        company: "XYZ Insurance",
        name: "Family Floater Gold",
        csr: 95.0,
        hospitals: 6000,
        budget_offset: 0,
        cap: 15_000,
        co_payment: 0.0,
        pre_days: 60,
        post_days: 90,
        score: 0.92,
    },
    Template {
        id: "family-health-optimizer",
        company: "PQR General Insurance",
        name: "Family Health Optimizer",
        csr: 93.0,
        hospitals: 5500,
        budget_offset: 3_000,
        cap: 12_000,
        co_payment: 0.05,
        pre_days: 30,
        post_days: 60,
        score: 0.87,
    },
];

const INDIVIDUAL: [Template; 2] = [
    Template {
        id: "individual-health-shield",
        company: "PQR General Insurance",
        name: "Individual Health Shield",
        csr: 97.0,
        hospitals: 4500,
        budget_offset: 0,
        cap: 8_000,
        co_payment: 0.0,
        pre_days: 60,
        post_days: 90,
        score: 0.9,
    },
    Template {
        id: "health-advantage",
        company: "LMN Insurance",
        name: "Health Advantage",
        csr: 94.0,
        hospitals: 4000,
        budget_offset: 2_000,
        cap: 6_000,
        co_payment: 0.05,
        pre_days: 30,
        post_days: 60,
        score: 0.85,
    },
];

/// Representative plans for a classification. Premiums never exceed the budget
/// and never go below zero.
pub fn fallback_policies(plan_type: PlanType, budget: u64) -> Vec<InsurancePolicy> {
    let templates: &[Template] = match plan_type {
        PlanType::SeniorCitizen => &SENIOR,
        PlanType::FamilyFloater => &FAMILY,
        PlanType::Individual => &INDIVIDUAL,
    };
    let budget = i64::try_from(budget).unwrap_or(i64::MAX);

    templates
        .iter()
        .map(|t| InsurancePolicy {
            policy_id: t.id.to_string(),
            company_name: t.company.to_string(),
            policy_name: t.name.to_string(),
            claim_settlement_ratio: t.csr,
            network_hospitals_count: t.hospitals,
            annual_premium: budget.saturating_sub(t.budget_offset).min(t.cap).max(0),
            co_payment: t.co_payment,
            pre_hospitalization_days: t.pre_days,
            post_hospitalization_days: t.post_days,
            total_score: t.score,
            type_of_plan: Some(plan_type.as_str().to_string()),
        })
        .collect()
}

const GENERIC_FEATURES: [(&str, &str); 6] = [
    ("coverage", "Comprehensive hospitalization coverage"),
    ("coverage", "Day care procedures covered"),
    ("coverage", "Pre and post hospitalization expenses"),
    ("benefit", "No claim bonus up to 50%"),
    ("benefit", "Free annual health check-up"),
    ("coverage", "Ambulance charges covered"),
];

/// Common health-insurance features, scoped to `policy_id`.
pub fn fallback_features(policy_id: &str) -> Vec<PolicyFeature> {
    GENERIC_FEATURES
        .iter()
        .enumerate()
        .map(|(i, (feature_type, description))| PolicyFeature {
            id: format!("{policy_id}-feature-{}", i + 1),
            policy_id: policy_id.to_string(),
            feature_type: feature_type.to_string(),
            description: description.to_string(),
            is_optional: false,
            included: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_senior_fallback_respects_budget() {
        let plans = fallback_policies(PlanType::SeniorCitizen, 9000);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].policy_name, "Senior Care Plus");
        assert_eq!(plans[0].annual_premium, 9000);
        assert_eq!(plans[1].annual_premium, 7000);
        assert!(plans.iter().all(|p| p.annual_premium <= 9000));
        assert!(
            plans
                .iter()
                .all(|p| p.type_of_plan.as_deref() == Some("Senior Citizen"))
        );
    }

    #[test]
    fn test_caps_apply_for_large_budgets() {
        let plans = fallback_policies(PlanType::FamilyFloater, 50_000);
        assert_eq!(plans[0].annual_premium, 15_000);
        assert_eq!(plans[1].annual_premium, 12_000);

        let plans = fallback_policies(PlanType::Individual, 50_000);
        assert_eq!(plans[0].annual_premium, 8_000);
        assert_eq!(plans[1].annual_premium, 6_000);
    }

    #[test]
    fn test_tiny_budget_never_goes_negative() {
        let plans = fallback_policies(PlanType::FamilyFloater, 1_000);
        assert_eq!(plans[0].annual_premium, 1_000);
        assert_eq!(plans[1].annual_premium, 0);
    }

    #[test]
    fn test_fallback_features_are_scoped() {
        let features = fallback_features("senior-shield");
        assert_eq!(features.len(), 6);
        assert!(features.iter().all(|f| f.policy_id == "senior-shield"));
        assert_eq!(features[0].id, "senior-shield-feature-1");
        assert_eq!(features[5].description, "Ambulance charges covered");
    }
}
