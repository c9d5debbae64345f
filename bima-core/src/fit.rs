//! Interactive fit calculator: how well a policy suits a household's risk profile.

use serde::{Deserialize, Serialize};

const BASE_SCORE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitInput {
    pub age: u32,
    #[serde(default)]
    pub pre_existing_conditions: bool,
    pub family_size: u32,
    /// Likelihoods are percentages, 0 to 100.
    #[serde(default)]
    pub hospital_stay_likelihood: f64,
    #[serde(default)]
    pub major_surgery_likelihood: f64,
    #[serde(default)]
    pub chronic_condition_likelihood: f64,
}

impl Default for FitInput {
    fn default() -> Self {
        Self {
            age: 35,
            pre_existing_conditions: false,
            family_size: 1,
            hospital_stay_likelihood: 10.0,
            major_surgery_likelihood: 5.0,
            chronic_condition_likelihood: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitLevel {
    Low,
    Medium,
    High,
}

impl FitLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => FitLevel::Low,
            40.. => FitLevel::Medium,
            _ => FitLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitLevel::Low => "Low Risk",
            FitLevel::Medium => "Medium Risk",
            FitLevel::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitAssessment {
    pub score: u8,
    pub level: FitLevel,
    pub recommendations: Vec<String>,
}

pub fn fit_score(input: &FitInput) -> u8 {
    let mut score = BASE_SCORE;

    if input.age < 30 {
        score += 10.0;
    } else if input.age >= 60 {
        score -= 15.0;
    } else if input.age >= 45 {
        score -= 5.0;
    }

    if input.pre_existing_conditions {
        score -= 15.0;
    }

    if input.family_size > 1 {
        score -= f64::from(input.family_size - 1) * 5.0;
    }

    score -= input.hospital_stay_likelihood / 100.0 * 20.0
        + input.major_surgery_likelihood / 100.0 * 30.0
        + input.chronic_condition_likelihood / 100.0 * 25.0;

    score.round().clamp(0.0, 100.0) as u8
}

pub fn assess_fit(input: &FitInput) -> FitAssessment {
    let score = fit_score(input);

    let advice = [
        (
            input.age >= 60,
            "Consider a senior-specific plan with lower co-payments",
        ),
        (
            input.pre_existing_conditions,
            "Look for policies with shorter waiting periods for pre-existing conditions",
        ),
        (
            input.family_size > 1,
            "A family floater policy may be more cost-effective than individual policies",
        ),
        (
            input.hospital_stay_likelihood > 20.0,
            "Choose a policy with no room rent limits or higher room rent limits",
        ),
        (
            input.major_surgery_likelihood > 10.0,
            "Ensure your policy has adequate coverage for major surgeries without sub-limits",
        ),
        (
            input.chronic_condition_likelihood > 15.0,
            "Select a policy that covers outpatient treatment and regular medication",
        ),
    ];

    let mut recommendations: Vec<String> = advice
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect();
    if recommendations.is_empty() {
        recommendations.push("This policy appears to be a good match for your risk profile".to_string());
    }

    FitAssessment {
        score,
        level: FitLevel::from_score(score),
        recommendations,
    }
}
