//! Three-step intake wizard for plan recommendations.
//!
//! Each step is its own typed record and is validated before the wizard moves on.
//! Going back keeps everything entered so far.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::claim::Gender;
use crate::error::ValidationError;
use crate::profile::{FamilySize, UserProfile};

pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
pub const BUDGET_RANGE: RangeInclusive<u64> = 5_000..=50_000;
pub const BUDGET_STEP: u64 = 1_000;
pub const COVERAGE_OPTIONS_LAKHS: [u32; 7] = [3, 5, 10, 15, 25, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Personal,
    Household,
    Coverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub age: u32,
    pub gender: Gender,
    pub location: String,
}

impl PersonalDetails {
    fn validate(&self) -> Result<(), ValidationError> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(ValidationError::invalid(
                "age",
                format!("must be between {} and {}", AGE_RANGE.start(), AGE_RANGE.end()),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::MissingField("location"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdDetails {
    pub family_size: FamilySize,
    pub pre_existing_conditions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveragePreferences {
    pub budget: u64,
    pub coverage_lakhs: u32,
}

impl CoveragePreferences {
    fn validate(&self) -> Result<(), ValidationError> {
        if !BUDGET_RANGE.contains(&self.budget) || self.budget % BUDGET_STEP != 0 {
            return Err(ValidationError::invalid(
                "budget",
                format!(
                    "must be a multiple of {} between {} and {}",
                    BUDGET_STEP,
                    BUDGET_RANGE.start(),
                    BUDGET_RANGE.end()
                ),
            ));
        }
        if !COVERAGE_OPTIONS_LAKHS.contains(&self.coverage_lakhs) {
            return Err(ValidationError::invalid(
                "coverageAmount",
                format!("{} lakhs is not an offered sum insured", self.coverage_lakhs),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct IntakeWizard {
    step: WizardStep,
    personal: Option<PersonalDetails>,
    household: Option<HouseholdDetails>,
    coverage: Option<CoveragePreferences>,
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Personal,
            personal: None,
            household: None,
            coverage: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn personal(&self) -> Option<&PersonalDetails> {
        self.personal.as_ref()
    }

    pub fn household(&self) -> Option<&HouseholdDetails> {
        self.household.as_ref()
    }

    pub fn coverage(&self) -> Option<&CoveragePreferences> {
        self.coverage.as_ref()
    }

    pub fn submit_personal(&mut self, details: PersonalDetails) -> Result<(), ValidationError> {
        self.expect_step(WizardStep::Personal)?;
        details.validate()?;
        self.personal = Some(details);
        self.step = WizardStep::Household;
        Ok(())
    }

    pub fn submit_household(&mut self, details: HouseholdDetails) -> Result<(), ValidationError> {
        self.expect_step(WizardStep::Household)?;
        self.household = Some(details);
        self.step = WizardStep::Coverage;
        Ok(())
    }

    /// Validates the last step and assembles the profile.
    pub fn finish(&mut self, prefs: CoveragePreferences) -> Result<UserProfile, ValidationError> {
        self.expect_step(WizardStep::Coverage)?;
        prefs.validate()?;

        let personal = self
            .personal
            .clone()
            .ok_or(ValidationError::MissingField("personal details"))?;
        let household = self
            .household
            .clone()
            .ok_or(ValidationError::MissingField("household details"))?;

        self.coverage = Some(prefs.clone());

        Ok(UserProfile {
            age: personal.age,
            gender: personal.gender,
            location: personal.location,
            family_size: household.family_size,
            pre_existing_conditions: household.pre_existing_conditions,
            budget: prefs.budget,
            coverage_lakhs: prefs.coverage_lakhs,
        })
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Personal | WizardStep::Household => WizardStep::Personal,
            WizardStep::Coverage => WizardStep::Household,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), ValidationError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(ValidationError::invalid(
                "step",
                format!("wizard is on {:?}, not {:?}", self.step, expected),
            ))
        }
    }
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}
