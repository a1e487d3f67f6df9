//! RegistrationWizard — drives the record through the three form pages and
//! hands it to the submission client.
//!
//! The two suspending operations, reading a photo file and posting the
//! record, are split into `begin_*` / `complete_*` halves joined by a
//! ticket. A completion whose ticket is no longer current is dropped, so a
//! late file read cannot clobber a newer photo and a second submit cannot
//! start while one is in flight. Every ticket carries a child of the
//! wizard's cancellation token; `teardown` cancels them all.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::model::{FormField, RecoveryPart, RecoverySlot, RegistrationRecord};
use super::questions::available_questions;
use super::state::WizardStep;
use crate::client::{RegisteredUser, SubmissionClient};
use crate::error::{PhotoError, SubmissionError, WizardError};
use crate::photo::{self, Camera, PhotoMode};
use crate::session::{Navigator, Route, SessionContext};

pub const MSG_REQUIRED_FIELDS: &str = "Please fill out all required fields";
pub const MSG_DUPLICATE_SKILL: &str = "Duplicate skill. Please add a different skill.";
pub const MSG_REGISTERED: &str = "Registration successful! You can now log in.";
pub const MSG_REGISTER_FAILED: &str = "Error registering user";

/// Collaborators injected at construction.
#[derive(Clone)]
pub struct WizardDeps {
    pub client: Arc<dyn SubmissionClient>,
    pub camera: Arc<dyn Camera>,
    pub session: Arc<dyn SessionContext>,
    pub navigator: Arc<dyn Navigator>,
}

/// Result of an add-skill attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    Added,
    Duplicate,
    /// Blank input; nothing happened.
    Ignored,
}

/// Result of a submission that got past validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Registered,
    Failed,
    Cancelled,
    /// The ticket was superseded; nothing was applied.
    Stale,
}

/// Handle for one in-flight photo read.
#[derive(Debug)]
pub struct PhotoTicket {
    generation: u64,
    token: CancellationToken,
}

impl PhotoTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Handle for one in-flight submission.
#[derive(Debug)]
pub struct SubmitTicket {
    generation: u64,
    token: CancellationToken,
}

impl SubmitTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// The three-step registration state machine.
pub struct RegistrationWizard {
    deps: WizardDeps,
    record: RegistrationRecord,
    step: WizardStep,
    skill_input: String,
    error: Option<String>,
    success: Option<String>,
    photo_mode: PhotoMode,
    photo_generation: u64,
    submit_generation: u64,
    in_flight: Option<(u64, CancellationToken)>,
    root: CancellationToken,
}

impl RegistrationWizard {
    pub fn new(deps: WizardDeps) -> Self {
        Self {
            deps,
            record: RegistrationRecord::default(),
            step: WizardStep::default(),
            skill_input: String::new(),
            error: None,
            success: None,
            photo_mode: PhotoMode::default(),
            photo_generation: 0,
            submit_generation: 0,
            in_flight: None,
            root: CancellationToken::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn skill_input(&self) -> &str {
        &self.skill_input
    }

    pub fn photo_mode(&self) -> PhotoMode {
        self.photo_mode
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Token cancelled on teardown. Clone it into whatever should be able
    /// to abort the wizard from outside (a signal handler, a parent view).
    pub fn cancel_handle(&self) -> CancellationToken {
        self.root.clone()
    }

    fn set_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    // ── Step navigation ─────────────────────────────────────────────────

    /// Validate the active step and move to the next one.
    ///
    /// A successful advance leaves any earlier message in place.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::BasicInfo => {
                let missing = self.record.missing_basic_info();
                if !missing.is_empty() {
                    debug!(missing = ?missing, "Basic info incomplete");
                    self.set_error(MSG_REQUIRED_FIELDS);
                    return Err(WizardError::MissingFields);
                }
                WizardStep::Skills
            }
            WizardStep::Skills => WizardStep::Recovery,
            step @ (WizardStep::Recovery | WizardStep::Submitted) => {
                self.set_error(MSG_REQUIRED_FIELDS);
                return Err(WizardError::NoAdvance(step));
            }
        };
        debug_assert!(self.step.can_transition_to(next));
        info!(from = %self.step, to = %next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    // ── Field edits ─────────────────────────────────────────────────────

    /// Set any text field. Photos go through capture instead.
    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), WizardError> {
        if self.step.is_terminal() {
            return Err(WizardError::AlreadySubmitted);
        }
        if field == FormField::Photo {
            return Err(WizardError::PhotoNotEditable);
        }
        self.record.set(field, value.into());
        Ok(())
    }

    /// Options for a question dropdown, excluding the other slot's choice.
    pub fn available_questions(&self, slot: RecoverySlot) -> Vec<&'static str> {
        available_questions(&self.record, slot)
    }

    /// Pick a question through the filtered selector.
    pub fn select_question(&mut self, slot: RecoverySlot, question: &str) -> Result<(), WizardError> {
        if !self.available_questions(slot).iter().any(|q| *q == question) {
            return Err(WizardError::QuestionUnavailable(question.to_string()));
        }
        self.edit_field(
            FormField::Recovery {
                slot,
                part: RecoveryPart::Question,
            },
            question,
        )
    }

    // ── Skills ──────────────────────────────────────────────────────────

    /// Ignored once the record has been handed off.
    pub fn set_skill_input(&mut self, value: impl Into<String>) {
        if self.step.is_terminal() {
            return;
        }
        self.skill_input = value.into();
    }

    /// Add whatever is in the skill input buffer.
    pub fn add_skill(&mut self) -> SkillOutcome {
        let candidate = self.skill_input.clone();
        self.add_skill_candidate(&candidate)
    }

    /// Add a trimmed skill, rejecting exact duplicates.
    pub fn add_skill_candidate(&mut self, candidate: &str) -> SkillOutcome {
        let skill = candidate.trim();
        if skill.is_empty() || self.step.is_terminal() {
            return SkillOutcome::Ignored;
        }
        if self.record.has_skill(skill) {
            self.set_error(MSG_DUPLICATE_SKILL);
            return SkillOutcome::Duplicate;
        }
        debug!(skill, "Skill added");
        self.record.skills.push(skill.to_string());
        self.skill_input.clear();
        SkillOutcome::Added
    }

    // ── Photo ───────────────────────────────────────────────────────────

    pub fn use_camera(&mut self) {
        self.photo_mode = PhotoMode::Camera;
    }

    pub fn use_file_upload(&mut self) {
        self.photo_mode = PhotoMode::FileUpload;
    }

    /// Snapshot the camera into `photo` and switch back to file upload.
    /// Any file read still in flight becomes stale.
    pub fn capture_from_camera(&mut self) -> Result<(), PhotoError> {
        if self.root.is_cancelled() || self.step.is_terminal() {
            return Err(PhotoError::Cancelled);
        }
        let url = self.deps.camera.snapshot().inspect_err(|e| {
            warn!(error = %e, "Camera snapshot failed");
        })?;
        self.photo_generation += 1;
        info!(size = url.len(), "Photo captured from camera");
        self.record.photo = url;
        self.photo_mode = PhotoMode::FileUpload;
        Ok(())
    }

    /// Start a file read. Supersedes any earlier read.
    pub fn begin_photo_read(&mut self) -> PhotoTicket {
        self.photo_generation += 1;
        PhotoTicket {
            generation: self.photo_generation,
            token: self.root.child_token(),
        }
    }

    /// Apply a finished read. Returns `Ok(false)` when the ticket is stale
    /// or cancelled and the result was discarded.
    pub fn complete_photo_read(
        &mut self,
        ticket: PhotoTicket,
        result: Result<String, PhotoError>,
    ) -> Result<bool, PhotoError> {
        if ticket.generation != self.photo_generation
            || ticket.token.is_cancelled()
            || self.step.is_terminal()
        {
            debug!(ticket = ticket.generation, current = self.photo_generation, "Discarding stale photo read");
            return Ok(false);
        }
        let url = result?;
        info!(size = url.len(), "Photo loaded from file");
        self.record.photo = url;
        Ok(true)
    }

    /// Read `path` as the profile photo.
    pub async fn upload_photo(&mut self, path: &Path) -> Result<bool, PhotoError> {
        let ticket = self.begin_photo_read();
        let token = ticket.token.clone();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(PhotoError::Cancelled),
            r = photo::read_data_url(path) => r,
        };
        self.complete_photo_read(ticket, result)
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Validate the recovery page and claim the single submission slot.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, WizardError> {
        match self.step {
            WizardStep::Recovery => {}
            WizardStep::Submitted => return Err(WizardError::AlreadySubmitted),
            step => return Err(WizardError::WrongStep(step)),
        }
        if self.in_flight.is_some() {
            warn!("Submit ignored, one is already in flight");
            return Err(WizardError::SubmissionInProgress);
        }
        if !self.record.recovery_complete() {
            self.set_error(MSG_REQUIRED_FIELDS);
            return Err(WizardError::MissingFields);
        }

        self.submit_generation += 1;
        let token = self.root.child_token();
        self.in_flight = Some((self.submit_generation, token.clone()));
        Ok(SubmitTicket {
            generation: self.submit_generation,
            token,
        })
    }

    /// Apply the backend's answer for `ticket`.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<RegisteredUser, SubmissionError>,
    ) -> SubmitOutcome {
        match &self.in_flight {
            Some((generation, _)) if *generation == ticket.generation => {}
            _ => {
                debug!(ticket = ticket.generation, "Discarding stale submission result");
                return SubmitOutcome::Stale;
            }
        }
        self.in_flight = None;

        if ticket.token.is_cancelled() {
            info!("Submission cancelled");
            return SubmitOutcome::Cancelled;
        }

        match result {
            Ok(user) => {
                self.success = Some(MSG_REGISTERED.to_string());
                self.error = None;
                self.deps.session.set_current_user(user);
                self.step = WizardStep::Submitted;
                self.deps.navigator.navigate(Route::Home);
                SubmitOutcome::Registered
            }
            Err(SubmissionError::Cancelled) => {
                info!("Submission cancelled");
                SubmitOutcome::Cancelled
            }
            Err(e) => {
                error!(error = %e, "Error from backend");
                self.set_error(MSG_REGISTER_FAILED);
                self.success = None;
                SubmitOutcome::Failed
            }
        }
    }

    /// Abandon the in-flight submission, if any. Its result will be stale.
    pub fn cancel_submit(&mut self) {
        if let Some((_, token)) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// Validate, post the record, and apply the result.
    ///
    /// Validation failures come back as `Err` and never reach the client.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WizardError> {
        let ticket = self.begin_submit()?;
        let token = ticket.token.clone();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(SubmissionError::Cancelled),
            r = self.deps.client.register(&self.record) => r,
        };
        Ok(self.complete_submit(ticket, result))
    }

    /// Cancel everything in flight. Later async operations fail as cancelled.
    pub fn teardown(&mut self) {
        self.root.cancel();
        self.photo_generation += 1;
        self.in_flight = None;
        debug!(step = %self.step, "Wizard torn down");
    }
}
