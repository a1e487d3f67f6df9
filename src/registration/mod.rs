//! Registration wizard — three form pages feeding one record.
//!
//! Page one collects identity fields and a photo, page two a skill list,
//! page three two distinct recovery questions. The finished record is
//! posted through a [`SubmissionClient`](crate::client::SubmissionClient).

pub mod model;
pub mod questions;
pub mod state;
pub mod wizard;

pub use model::{FormField, IdentityField, RecoveryPair, RecoveryPart, RecoverySlot, RegistrationRecord};
pub use questions::{QUESTION_OPTIONS, available_questions};
pub use state::WizardStep;
pub use wizard::{
    PhotoTicket, RegistrationWizard, SkillOutcome, SubmitOutcome, SubmitTicket, WizardDeps,
};
