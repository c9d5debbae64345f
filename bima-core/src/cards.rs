//! Presentation records for recommended plans.

use serde::{Deserialize, Serialize};

use crate::resolver::RankedPolicy;

const MAX_KEY_FEATURES: usize = 5;
const LAKHS_PER_CRORE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationalSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCard {
    pub name: String,
    pub provider: String,
    pub premium: String,
    pub coverage: String,
    /// `total_score` as a rounded percentage.
    pub suitability_score: u32,
    pub key_features: Vec<String>,
    pub why_recommended: Vec<String>,
    pub educational_content: Vec<EducationalSection>,
}

impl PlanCard {
    pub fn from_ranked(ranked: &RankedPolicy, coverage_lakhs: u32) -> Self {
        let policy = &ranked.policy;
        let score = suitability(policy.total_score);
        let premium = format_inr(policy.annual_premium);

        let key_features = ranked
            .features
            .iter()
            .map(|f| f.description.trim())
            .filter(|d| !d.is_empty())
            .take(MAX_KEY_FEATURES)
            .map(str::to_string)
            .collect();

        let why_recommended = vec![
            format!(
                "High claim settlement ratio of {}%",
                policy.claim_settlement_ratio
            ),
            format!(
                "Access to {}+ network hospitals",
                format_grouped(policy.network_hospitals_count)
            ),
            format!(
                "{} days pre-hospitalization coverage",
                policy.pre_hospitalization_days
            ),
            format!(
                "{} days post-hospitalization coverage",
                policy.post_hospitalization_days
            ),
        ];

        let title = if ranked.rank == 1 {
            "Why This Is Your Top Match"
        } else {
            "About This Plan"
        };
        let co_payment = if policy.co_payment > 0.0 {
            format!(
                "This plan has a co-payment clause of {}%, meaning you pay this percentage of any claim amount.",
                format_percent(policy.co_payment)
            )
        } else {
            "This plan has no co-payment requirement, which means the insurer covers the entire approved claim amount.".to_string()
        };

        let educational_content = vec![
            EducationalSection {
                title: title.to_string(),
                content: format!(
                    "This plan has a score of {score}% based on your requirements. It offers a good balance of coverage and affordability with an annual premium of {premium}."
                ),
            },
            EducationalSection {
                title: "Co-payment Details".to_string(),
                content: co_payment,
            },
            EducationalSection {
                title: "Hospitalization Coverage".to_string(),
                content: format!(
                    "This plan covers medical expenses {} days before hospitalization and {} days after discharge.",
                    policy.pre_hospitalization_days, policy.post_hospitalization_days
                ),
            },
        ];

        Self {
            name: policy.policy_name.clone(),
            provider: policy.company_name.clone(),
            premium: format!("{premium}/year"),
            coverage: format_coverage(coverage_lakhs),
            suitability_score: score,
            key_features,
            why_recommended,
            educational_content,
        }
    }
}

fn suitability(total_score: f64) -> u32 {
    (total_score * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Rupee amount with Indian digit grouping, e.g. `₹1,25,000`.
pub fn format_inr(amount: i64) -> String {
    format!("₹{}", format_grouped(amount))
}

/// Sum insured label. Whole crores are shown as crores.
pub fn format_coverage(lakhs: u32) -> String {
    if lakhs >= LAKHS_PER_CRORE && lakhs % LAKHS_PER_CRORE == 0 {
        let crores = lakhs / LAKHS_PER_CRORE;
        let unit = if crores == 1 { "Crore" } else { "Crores" };
        format!("₹{crores} {unit}")
    } else {
        format!("₹{lakhs} Lakhs")
    }
}

// Last three digits, then pairs.
fn format_grouped(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };
    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{sign}{},{tail}", groups.join(","))
}

fn format_percent(fraction: f64) -> String {
    let percent = (fraction * 1000.0).round() / 10.0;
    if percent.fract() == 0.0 {
        format!("{}", percent as i64)
    } else {
        format!("{percent}")
    }
}
