//! Terminal front end — walks a user through the wizard over a line reader
//! and a writer (stdin/stdout in the binary).

use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, WizardError};
use crate::photo::PhotoMode;
use crate::registration::{
    FormField, RecoveryPart, RecoverySlot, RegistrationWizard, SkillOutcome, SubmitOutcome,
    WizardStep,
};

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalOutcome {
    Registered,
    /// Input closed, the user gave up, or the session was cancelled.
    Aborted,
}

/// Line-oriented driver for a [`RegistrationWizard`].
pub struct TerminalWizard<R, W> {
    wizard: RegistrationWizard,
    lines: Lines<R>,
    out: W,
    cancel: CancellationToken,
    shown: (Option<String>, Option<String>),
}

impl<R, W> TerminalWizard<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(wizard: RegistrationWizard, input: R, output: W) -> Self {
        let cancel = wizard.cancel_handle();
        Self {
            wizard,
            lines: input.lines(),
            out: output,
            cancel,
            shown: (None, None),
        }
    }

    pub fn wizard(&self) -> &RegistrationWizard {
        &self.wizard
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run until the user is registered or input ends.
    pub async fn run(&mut self) -> Result<TerminalOutcome> {
        self.say("\nRegister\n").await?;
        loop {
            let step = self.wizard.step();
            if let Some(n) = step.number() {
                self.say(&format!("── Step {n}/3: {} ──", step.title())).await?;
            }
            let finished = match step {
                WizardStep::BasicInfo => self.basic_info().await?,
                WizardStep::Skills => self.skills().await?,
                WizardStep::Recovery => self.recovery().await?,
                WizardStep::Submitted => return Ok(TerminalOutcome::Registered),
            };
            if let Some(outcome) = finished {
                if outcome == TerminalOutcome::Aborted {
                    self.wizard.teardown();
                }
                return Ok(outcome);
            }
        }
    }

    async fn say(&mut self, line: &str) -> Result<()> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    /// Read one line; `None` on EOF or cancellation.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        let line = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            line = self.lines.next_line() => line?,
        };
        Ok(line)
    }

    /// Print the message slots. Unless `fresh` (the last action just set
    /// them), nothing is printed when they match what was shown before.
    async fn show_messages(&mut self, fresh: bool) -> Result<()> {
        let current = (
            self.wizard.error().map(str::to_string),
            self.wizard.success().map(str::to_string),
        );
        if !fresh && current == self.shown {
            return Ok(());
        }
        if let Some(error) = &current.0 {
            self.say(&format!("✗ {error}")).await?;
        }
        if let Some(success) = &current.1 {
            self.say(&format!("✓ {success}")).await?;
        }
        self.shown = current;
        Ok(())
    }

    async fn basic_info(&mut self) -> Result<Option<TerminalOutcome>> {
        for field in self.wizard.record().missing_basic_info() {
            let FormField::Identity(id) = field else {
                continue;
            };
            let Some(value) = self.read_line(&format!("{}: ", id.label())).await? else {
                return Ok(Some(TerminalOutcome::Aborted));
            };
            self.wizard.edit_field(field, value)?;
        }

        if self.wizard.record().photo.is_empty() && !self.photo().await? {
            return Ok(Some(TerminalOutcome::Aborted));
        }

        if self.wizard.advance().is_err() {
            self.show_messages(true).await?;
        }
        Ok(None)
    }

    /// Prompt until a photo is set or the user leaves it blank. Returns
    /// `false` on EOF.
    async fn photo(&mut self) -> Result<bool> {
        loop {
            match self.wizard.photo_mode() {
                PhotoMode::FileUpload => {
                    let Some(input) = self
                        .read_line("Photo (image path, or 'camera' to use the webcam): ")
                        .await?
                    else {
                        return Ok(false);
                    };
                    let input = input.trim();
                    if input.is_empty() {
                        return Ok(true);
                    }
                    if input.eq_ignore_ascii_case("camera") {
                        self.wizard.use_camera();
                        continue;
                    }
                    match self.wizard.upload_photo(Path::new(input)).await {
                        Ok(_) => return Ok(true),
                        Err(e) => self.say(&format!("✗ {e}")).await?,
                    }
                }
                PhotoMode::Camera => {
                    let Some(input) = self
                        .read_line("Press Enter to capture, or type 'upload' to pick a file: ")
                        .await?
                    else {
                        return Ok(false);
                    };
                    if input.trim().eq_ignore_ascii_case("upload") {
                        self.wizard.use_file_upload();
                        continue;
                    }
                    match self.wizard.capture_from_camera() {
                        Ok(()) => return Ok(true),
                        Err(e) => self.say(&format!("✗ {e}")).await?,
                    }
                }
            }
        }
    }

    async fn skills(&mut self) -> Result<Option<TerminalOutcome>> {
        loop {
            self.say("  #  Skill").await?;
            let rows: Vec<String> = self
                .wizard
                .record()
                .skills
                .iter()
                .enumerate()
                .map(|(i, skill)| format!("  {:<2} {skill}", i + 1))
                .collect();
            for row in rows {
                self.say(&row).await?;
            }
            let Some(line) = self.read_line("Skill (empty line to continue): ").await? else {
                return Ok(Some(TerminalOutcome::Aborted));
            };
            if line.trim().is_empty() {
                self.wizard.advance()?;
                return Ok(None);
            }
            self.wizard.set_skill_input(line);
            let outcome = self.wizard.add_skill();
            self.show_messages(outcome == SkillOutcome::Duplicate).await?;
        }
    }

    /// Numbered menu of the questions offered for `slot`. `false` on EOF.
    async fn choose_question(&mut self, slot: RecoverySlot) -> Result<bool> {
        let label = match slot {
            RecoverySlot::First => "Question 1",
            RecoverySlot::Second => "Question 2",
        };
        loop {
            let options = self.wizard.available_questions(slot);
            self.say(&format!("{label}:")).await?;
            for (i, question) in options.iter().enumerate() {
                self.say(&format!("  {}) {question}", i + 1)).await?;
            }
            let Some(line) = self.read_line("Select a question: ").await? else {
                return Ok(false);
            };
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i).copied());
            match picked {
                Some(question) => {
                    self.wizard.select_question(slot, question)?;
                    return Ok(true);
                }
                None => {
                    self.say(&format!("✗ Pick a number between 1 and {}", options.len()))
                        .await?
                }
            }
        }
    }

    async fn recovery(&mut self) -> Result<Option<TerminalOutcome>> {
        for slot in [RecoverySlot::First, RecoverySlot::Second] {
            if self.wizard.record().recovery(slot).is_complete() {
                continue;
            }
            if !self.choose_question(slot).await? {
                return Ok(Some(TerminalOutcome::Aborted));
            }
            let Some(answer) = self.read_line("Answer: ").await? else {
                return Ok(Some(TerminalOutcome::Aborted));
            };
            self.wizard.edit_field(
                FormField::Recovery {
                    slot,
                    part: RecoveryPart::Answer,
                },
                answer,
            )?;
        }

        self.say("Submitting registration...").await?;
        let outcome = match self.wizard.submit().await {
            Ok(outcome) => outcome,
            Err(WizardError::MissingFields) => {
                self.show_messages(true).await?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        self.show_messages(true).await?;

        match outcome {
            SubmitOutcome::Registered => Ok(Some(TerminalOutcome::Registered)),
            SubmitOutcome::Cancelled | SubmitOutcome::Stale => Ok(Some(TerminalOutcome::Aborted)),
            SubmitOutcome::Failed => {
                let Some(line) = self.read_line("Try again? [Y/n]: ").await? else {
                    return Ok(Some(TerminalOutcome::Aborted));
                };
                if line.trim().eq_ignore_ascii_case("n") {
                    Ok(Some(TerminalOutcome::Aborted))
                } else {
                    Ok(None)
                }
            }
        }
    }
}
