//! Wizard step state machine — tracks which form page is active.

use serde::{Deserialize, Serialize};

/// The steps of the registration wizard.
///
/// Progresses linearly: BasicInfo → Skills → Recovery → Submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    BasicInfo,
    Skills,
    Recovery,
    Submitted,
}

impl WizardStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        use WizardStep::*;
        matches!(
            (self, target),
            (BasicInfo, Skills) | (Skills, Recovery) | (Recovery, Submitted)
        )
    }

    /// Whether this step is terminal (the record has been handed off).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        use WizardStep::*;
        match self {
            BasicInfo => Some(Skills),
            Skills => Some(Recovery),
            Recovery => Some(Submitted),
            Submitted => None,
        }
    }

    /// 1-based page number shown to the user. `Submitted` has none.
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::BasicInfo => Some(1),
            Self::Skills => Some(2),
            Self::Recovery => Some(3),
            Self::Submitted => None,
        }
    }

    /// Page heading.
    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::Skills => "Your Skills",
            Self::Recovery => "Recovery Questions",
            Self::Submitted => "Registered",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BasicInfo => "basic_info",
            Self::Skills => "skills",
            Self::Recovery => "recovery",
            Self::Submitted => "submitted",
        };
        write!(f, "{s}")
    }
}
