use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::claim::Gender;
use crate::error::ValidationError;

/// Age at which every applicant is steered to senior-citizen plans.
pub const SENIOR_AGE: u32 = 60;

/// The three plan families the store is partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    Individual,
    #[serde(rename = "Family Floater")]
    FamilyFloater,
    #[serde(rename = "Senior Citizen")]
    SeniorCitizen,
}

impl PlanType {
    /// Value stored in the `type_of_plan` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PlanType::Individual => "Individual",
            PlanType::FamilyFloater => "Family Floater",
            PlanType::SeniorCitizen => "Senior Citizen",
        }
    }

    /// Seniority wins over household size.
    pub fn classify(age: u32, family_size: FamilySize) -> Self {
        if age >= SENIOR_AGE {
            PlanType::SeniorCitizen
        } else if family_size != FamilySize::One {
            PlanType::FamilyFloater
        } else {
            PlanType::Individual
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Household buckets offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FamilySize {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5+")]
    FiveOrMore,
}

impl FamilySize {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(FamilySize::One),
            "2" => Some(FamilySize::Two),
            "3" => Some(FamilySize::Three),
            "4" => Some(FamilySize::Four),
            "5+" => Some(FamilySize::FiveOrMore),
            _ => None,
        }
    }

    /// Minimum number of covered members in the bucket.
    pub fn members(self) -> u32 {
        match self {
            FamilySize::One => 1,
            FamilySize::Two => 2,
            FamilySize::Three => 3,
            FamilySize::Four => 4,
            FamilySize::FiveOrMore => 5,
        }
    }
}

/// Validated applicant profile that drives plan resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub location: String,
    pub family_size: FamilySize,
    pub pre_existing_conditions: bool,
    /// Annual premium budget in rupees.
    pub budget: u64,
    /// Desired sum insured in lakhs.
    pub coverage_lakhs: u32,
}

impl UserProfile {
    pub fn plan_type(&self) -> PlanType {
        PlanType::classify(self.age, self.family_size)
    }
}

/// Raw recommendation request as submitted by a client.
///
/// Numeric fields are accepted either as JSON numbers or as strings, since the
/// browser form keeps them as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub family_size: Option<String>,
    #[serde(default)]
    pub pre_existing_conditions: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub budget: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub coverage_amount: Option<String>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<UserProfile, ValidationError> {
        let age = required(&self.age, "age")?;
        let age: u32 = age
            .parse()
            .map_err(|_| ValidationError::invalid("age", "must be a whole number of years"))?;

        let budget = required(&self.budget, "budget")?;
        let budget: f64 = budget
            .parse()
            .map_err(|_| ValidationError::invalid("budget", "must be a positive number"))?;
        if !budget.is_finite() || budget.round() < 1.0 {
            return Err(ValidationError::invalid("budget", "must be a positive number"));
        }

        let coverage = required(&self.coverage_amount, "coverageAmount")?;
        let coverage_lakhs = coverage
            .parse::<u32>()
            .ok()
            .filter(|lakhs| *lakhs > 0)
            .ok_or_else(|| {
                ValidationError::invalid("coverageAmount", "must be a positive number of lakhs")
            })?;

        let family_size = match self.family_size.as_deref() {
            None | Some("") => FamilySize::One,
            Some(raw) => FamilySize::parse(raw)
                .ok_or_else(|| ValidationError::invalid("familySize", format!("unknown bucket {raw:?}")))?,
        };

        Ok(UserProfile {
            age,
            gender: self.gender.unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            family_size,
            pre_existing_conditions: self.pre_existing_conditions,
            budget: budget.round() as u64,
            coverage_lakhs,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(age: &str, family: &str, budget: &str, coverage: &str) -> ProfileForm {
        ProfileForm {
            age: Some(age.to_string()),
            family_size: Some(family.to_string()),
            budget: Some(budget.to_string()),
            coverage_amount: Some(coverage.to_string()),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn test_classification_is_total() {
        let sizes = [
            FamilySize::One,
            FamilySize::Two,
            FamilySize::Three,
            FamilySize::Four,
            FamilySize::FiveOrMore,
        ];
        for age in 0..=110 {
            for size in sizes {
                let plan = PlanType::classify(age, size);
                let expected = if age >= 60 {
                    PlanType::SeniorCitizen
                } else if size == FamilySize::One {
                    PlanType::Individual
                } else {
                    PlanType::FamilyFloater
                };
                assert_eq!(plan, expected);
            }
        }
    }

    #[test]
    fn test_senior_boundary_is_inclusive() {
        assert_eq!(PlanType::classify(59, FamilySize::One), PlanType::Individual);
        assert_eq!(PlanType::classify(60, FamilySize::One), PlanType::SeniorCitizen);
        assert_eq!(PlanType::classify(60, FamilySize::Four), PlanType::SeniorCitizen);
    }

    #[test]
    fn test_plan_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&PlanType::FamilyFloater).unwrap(),
            "\"Family Floater\""
        );
        assert_eq!(PlanType::SeniorCitizen.to_string(), "Senior Citizen");
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let profile = form("70", "1", "9000", "5").validate().unwrap();
        assert_eq!(profile.age, 70);
        assert_eq!(profile.budget, 9000);
        assert_eq!(profile.coverage_lakhs, 5);
        assert_eq!(profile.plan_type(), PlanType::SeniorCitizen);
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let mut f = form("30", "1", "10000", "5");
        f.age = None;
        assert_eq!(f.validate(), Err(ValidationError::MissingField("age")));

        let mut f = form("30", "1", "10000", "5");
        f.budget = Some("  ".to_string());
        assert_eq!(f.validate(), Err(ValidationError::MissingField("budget")));

        let mut f = form("30", "1", "10000", "5");
        f.coverage_amount = None;
        assert_eq!(
            f.validate(),
            Err(ValidationError::MissingField("coverageAmount"))
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_budget() {
        assert!(matches!(
            form("30", "1", "0", "5").validate(),
            Err(ValidationError::InvalidField { field: "budget", .. })
        ));
        assert!(matches!(
            form("30", "1", "-500", "5").validate(),
            Err(ValidationError::InvalidField { field: "budget", .. })
        ));
        assert!(matches!(
            form("30", "1", "abc", "5").validate(),
            Err(ValidationError::InvalidField { field: "budget", .. })
        ));
    }

    #[test]
    fn test_missing_family_size_defaults_to_individual() {
        let mut f = form("30", "1", "10000", "5");
        f.family_size = None;
        assert_eq!(f.validate().unwrap().plan_type(), PlanType::Individual);

        assert_eq!(
            form("30", "5+", "10000", "5").validate().unwrap().plan_type(),
            PlanType::FamilyFloater
        );
    }

    #[test]
    fn test_form_accepts_numbers_or_strings() {
        let json = r#"{"age": "42", "budget": 15000, "coverageAmount": "10", "familySize": "3"}"#;
        let f: ProfileForm = serde_json::from_str(json).unwrap();
        let profile = f.validate().unwrap();
        assert_eq!(profile.budget, 15000);
        assert_eq!(profile.family_size, FamilySize::Three);
        assert_eq!(profile.plan_type(), PlanType::FamilyFloater);

        let bad = r#"{"age": true}"#;
        assert!(serde_json::from_str::<ProfileForm>(bad).is_err());
    }
}
