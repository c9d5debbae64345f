//! Claim-rejection scoring.
//!
//! The weights below are a fixed point-scoring heuristic, not a statistical model.
//! Each condition contributes independently; there are no interaction terms.

use serde::{Deserialize, Serialize};

/// Upper bound on the reported rejection probability.
pub const MAX_REJECTION_PROBABILITY: u32 = 95;

/// Claims above this amount (in rupees) receive extra scrutiny.
pub const HIGH_CLAIM_THRESHOLD: u64 = 100_000;

const SENIOR_AGE_POINTS: u32 = 5;
const PED_WAITING_INCOMPLETE_POINTS: u32 = 40;
const PED_WAITING_COMPLETE_POINTS: u32 = 10;
const NON_NETWORK_POINTS: u32 = 15;
const NO_PRE_AUTH_POINTS: u32 = 25;
const INCOMPLETE_DOCS_POINTS: u32 = 30;
const HIGH_CLAIM_POINTS: u32 = 10;
const NEW_POLICY_POINTS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentType {
    #[default]
    Hospitalization,
    Daycare,
    Surgery,
    Maternity,
    Outpatient,
}

/// How long the policy has been in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicyDuration {
    #[serde(rename = "less-than-1")]
    LessThanOneYear,
    #[default]
    #[serde(rename = "1-3")]
    OneToThreeYears,
    #[serde(rename = "3-5")]
    ThreeToFiveYears,
    #[serde(rename = "more-than-5")]
    MoreThanFiveYears,
}

/// Everything the predictor asks about a single claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCase {
    pub patient_age: u32,
    #[serde(default)]
    pub patient_gender: Gender,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub treatment_type: TreatmentType,
    #[serde(default)]
    pub hospital_stay_duration: u32,
    pub pre_existing_condition: bool,
    pub waiting_period_completed: bool,
    pub network_hospital: bool,
    pub pre_authorization: bool,
    pub claim_amount: u64,
    pub policy_duration: PolicyDuration,
    pub documentation_complete: bool,
}

impl Default for ClaimCase {
    fn default() -> Self {
        Self {
            patient_age: 35,
            patient_gender: Gender::Male,
            diagnosis: String::new(),
            treatment_type: TreatmentType::Hospitalization,
            hospital_stay_duration: 3,
            pre_existing_condition: false,
            waiting_period_completed: true,
            network_hospital: true,
            pre_authorization: true,
            claim_amount: 50_000,
            policy_duration: PolicyDuration::OneToThreeYears,
            documentation_complete: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub impact: Impact,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionAssessment {
    pub rejection_probability: u32,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

impl RejectionAssessment {
    pub fn has_high_impact_factor(&self) -> bool {
        self.factors.iter().any(|f| f.impact == Impact::High)
    }
}

struct Check {
    applies: fn(&ClaimCase) -> bool,
    factor: &'static str,
    impact: Impact,
    description: &'static str,
    mitigation: &'static str,
}

const CHECKS: [Check; 6] = [
    Check {
        applies: |c| c.pre_existing_condition && !c.waiting_period_completed,
        factor: "Pre-existing condition waiting period not completed",
        impact: Impact::High,
        description: "Your policy requires a waiting period before covering pre-existing conditions. This claim falls within that period.",
        mitigation: "Wait until the pre-existing condition waiting period is completed before seeking elective treatment",
    },
    Check {
        applies: |c| !c.pre_authorization,
        factor: "No pre-authorization obtained",
        impact: Impact::High,
        description: "Pre-authorization is required for planned hospitalizations. Failure to obtain it can lead to claim rejection.",
        mitigation: "Always obtain pre-authorization for planned hospitalizations",
    },
    Check {
        applies: |c| !c.network_hospital,
        factor: "Non-network hospital",
        impact: Impact::Medium,
        description: "Treatment at non-network hospitals may have different claim processes and could lead to partial rejection.",
        mitigation: "Choose a network hospital for cashless and smoother claim processing",
    },
    Check {
        applies: |c| !c.documentation_complete,
        factor: "Incomplete documentation",
        impact: Impact::High,
        description: "Missing documents like discharge summary, investigation reports, or original bills can lead to claim rejection.",
        mitigation: "Ensure all required documents (discharge summary, bills, reports) are submitted with the claim",
    },
    Check {
        applies: |c| c.policy_duration == PolicyDuration::LessThanOneYear,
        factor: "New policy (less than 1 year)",
        impact: Impact::Medium,
        description: "New policies have stricter scrutiny and initial waiting periods for certain conditions.",
        mitigation: "Check the initial waiting periods in your policy schedule before filing, and keep records of any prior coverage for continuity",
    },
    Check {
        applies: |c| c.claim_amount > HIGH_CLAIM_THRESHOLD,
        factor: "High claim amount",
        impact: Impact::Low,
        description: "Higher claim amounts undergo more detailed scrutiny, which may increase the chance of finding discrepancies.",
        mitigation: "Keep itemised bills and reports ready, since larger claims are reviewed line by line",
    },
];

const GOOD_STANDING: &str =
    "Your claim appears to be in good standing with minimal risk of rejection";

/// Raw point total before the ceiling is applied.
pub fn raw_score(case: &ClaimCase) -> u32 {
    let mut points = 0;

    if case.patient_age > 60 {
        points += SENIOR_AGE_POINTS;
    }
    if case.pre_existing_condition {
        points += if case.waiting_period_completed {
            PED_WAITING_COMPLETE_POINTS
        } else {
            PED_WAITING_INCOMPLETE_POINTS
        };
    }
    if !case.network_hospital {
        points += NON_NETWORK_POINTS;
    }
    if !case.pre_authorization {
        points += NO_PRE_AUTH_POINTS;
    }
    if !case.documentation_complete {
        points += INCOMPLETE_DOCS_POINTS;
    }
    if case.claim_amount > HIGH_CLAIM_THRESHOLD {
        points += HIGH_CLAIM_POINTS;
    }
    if case.policy_duration == PolicyDuration::LessThanOneYear {
        points += NEW_POLICY_POINTS;
    }

    points
}

/// Score a claim. Total and side-effect free.
pub fn assess(case: &ClaimCase) -> RejectionAssessment {
    let rejection_probability = raw_score(case).min(MAX_REJECTION_PROBABILITY);

    let present: Vec<&Check> = CHECKS.iter().filter(|check| (check.applies)(case)).collect();

    let factors = present
        .iter()
        .map(|check| RiskFactor {
            factor: check.factor.to_string(),
            impact: check.impact,
            description: check.description.to_string(),
        })
        .collect();

    let mut recommendations: Vec<String> = present
        .iter()
        .map(|check| check.mitigation.to_string())
        .collect();
    if recommendations.is_empty() {
        recommendations.push(GOOD_STANDING.to_string());
    }

    RejectionAssessment {
        rejection_probability,
        factors,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senior_with_ped() -> ClaimCase {
        ClaimCase {
            patient_age: 65,
            pre_existing_condition: true,
            waiting_period_completed: false,
            network_hospital: true,
            pre_authorization: true,
            claim_amount: 50_000,
            documentation_complete: true,
            policy_duration: PolicyDuration::OneToThreeYears,
            ..ClaimCase::default()
        }
    }

    #[test]
    fn test_default_case_is_clean() {
        let result = assess(&ClaimCase::default());
        assert_eq!(result.rejection_probability, 0);
        assert!(result.factors.is_empty());
        assert_eq!(result.recommendations, vec![GOOD_STANDING.to_string()]);
    }

    #[test]
    fn test_waiting_period_incomplete_scores_high() {
        let result = assess(&senior_with_ped());
        assert_eq!(result.rejection_probability, 45);

        let waiting: Vec<_> = result
            .factors
            .iter()
            .filter(|f| f.factor.contains("waiting period") && f.impact == Impact::High)
            .collect();
        assert_eq!(waiting.len(), 1);
        assert_eq!(result.factors.len(), 1);
    }

    #[test]
    fn test_waiting_period_complete_scores_low() {
        let case = ClaimCase {
            waiting_period_completed: true,
            ..senior_with_ped()
        };
        let result = assess(&case);
        assert_eq!(result.rejection_probability, 15);
        assert!(!result.factors.iter().any(|f| f.factor.contains("waiting period")));
        assert!(!result.has_high_impact_factor());
    }

    #[test]
    fn test_every_condition_is_clamped() {
        let case = ClaimCase {
            patient_age: 70,
            pre_existing_condition: true,
            waiting_period_completed: false,
            network_hospital: false,
            pre_authorization: false,
            documentation_complete: false,
            claim_amount: 150_000,
            policy_duration: PolicyDuration::LessThanOneYear,
            ..ClaimCase::default()
        };
        assert_eq!(raw_score(&case), 140);

        let result = assess(&case);
        assert_eq!(result.rejection_probability, MAX_REJECTION_PROBABILITY);
        assert_eq!(result.factors.len(), 6);
        assert_eq!(result.recommendations.len(), 6);
        assert_eq!(result.factors[0].impact, Impact::High);
        assert_eq!(result.factors[5].factor, "High claim amount");
        assert_eq!(result.factors[5].impact, Impact::Low);
    }

    #[test]
    fn test_age_boundary_is_exclusive() {
        let at_sixty = ClaimCase {
            patient_age: 60,
            ..ClaimCase::default()
        };
        assert_eq!(assess(&at_sixty).rejection_probability, 0);

        let over = ClaimCase {
            patient_age: 61,
            ..ClaimCase::default()
        };
        assert_eq!(assess(&over).rejection_probability, 5);
        // Age alone is not a listed risk factor.
        assert!(assess(&over).factors.is_empty());
    }

    #[test]
    fn test_claim_amount_threshold() {
        let at = ClaimCase {
            claim_amount: HIGH_CLAIM_THRESHOLD,
            ..ClaimCase::default()
        };
        assert_eq!(assess(&at).rejection_probability, 0);

        let above = ClaimCase {
            claim_amount: HIGH_CLAIM_THRESHOLD + 1,
            ..ClaimCase::default()
        };
        let result = assess(&above);
        assert_eq!(result.rejection_probability, 10);
        assert_eq!(result.factors[0].impact, Impact::Low);
    }

    #[test]
    fn test_probability_never_exceeds_ceiling() {
        let flags = [false, true];
        for ped in flags {
            for waiting in flags {
                for network in flags {
                    for pre_auth in flags {
                        for docs in flags {
                            let case = ClaimCase {
                                patient_age: 75,
                                pre_existing_condition: ped,
                                waiting_period_completed: waiting,
                                network_hospital: network,
                                pre_authorization: pre_auth,
                                documentation_complete: docs,
                                claim_amount: 500_000,
                                policy_duration: PolicyDuration::LessThanOneYear,
                                ..ClaimCase::default()
                            };
                            let result = assess(&case);
                            assert!(result.rejection_probability <= MAX_REJECTION_PROBABILITY);
                            assert_eq!(result, assess(&case));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_deserializes_wire_format() {
        let json = r#"{
            "patientAge": 65,
            "patientGender": "female",
            "diagnosis": "cataract",
            "treatmentType": "surgery",
            "hospitalStayDuration": 1,
            "preExistingCondition": true,
            "waitingPeriodCompleted": false,
            "networkHospital": true,
            "preAuthorization": true,
            "claimAmount": 50000,
            "policyDuration": "1-3",
            "documentationComplete": true
        }"#;
        let case: ClaimCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.treatment_type, TreatmentType::Surgery);
        assert_eq!(assess(&case).rejection_probability, 45);

        let out = serde_json::to_value(assess(&case)).unwrap();
        assert_eq!(out["rejectionProbability"], 45);
        assert_eq!(out["factors"][0]["impact"], "high");
    }
}
