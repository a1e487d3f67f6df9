//! Registration record and field addressing.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::WizardError;

/// One of the eight identity fields collected on the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Username,
    FirstName,
    LastName,
    Gender,
    Email,
    Password,
    PhoneNumber,
    Education,
}

impl IdentityField {
    /// All identity fields, in form order.
    pub const ALL: [IdentityField; 8] = [
        Self::Username,
        Self::FirstName,
        Self::LastName,
        Self::Gender,
        Self::Email,
        Self::Password,
        Self::PhoneNumber,
        Self::Education,
    ];

    /// Wire name, as it appears in the JSON body.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Gender => "gender",
            Self::Email => "email",
            Self::Password => "password",
            Self::PhoneNumber => "phone_number",
            Self::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Gender => "Gender",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::PhoneNumber => "Phone Number",
            Self::Education => "Education",
        }
    }
}

/// Which of the two recovery pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoverySlot {
    First,
    Second,
}

impl RecoverySlot {
    pub fn other(&self) -> RecoverySlot {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::First => "recovery_q1",
            Self::Second => "recovery_q2",
        }
    }
}

/// Which half of a recovery pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryPart {
    Question,
    Answer,
}

impl RecoveryPart {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }
}

/// Address of a single editable value in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Identity(IdentityField),
    Photo,
    Recovery { slot: RecoverySlot, part: RecoveryPart },
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity(field) => write!(f, "{}", field.name()),
            Self::Photo => write!(f, "photo"),
            Self::Recovery { slot, part } => write!(f, "{}.{}", slot.key(), part.key()),
        }
    }
}

impl std::str::FromStr for FormField {
    type Err = WizardError;

    /// Parse a wire name such as `email` or `recovery_q2.answer`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "photo" {
            return Ok(Self::Photo);
        }
        if let Some(field) = IdentityField::ALL.iter().find(|f| f.name() == s) {
            return Ok(Self::Identity(*field));
        }
        let unknown = || WizardError::UnknownField(s.to_string());
        let (slot, part) = s.split_once('.').ok_or_else(unknown)?;
        let slot = match slot {
            "recovery_q1" => RecoverySlot::First,
            "recovery_q2" => RecoverySlot::Second,
            _ => return Err(unknown()),
        };
        let part = match part {
            "question" => RecoveryPart::Question,
            "answer" => RecoveryPart::Answer,
            _ => return Err(unknown()),
        };
        Ok(Self::Recovery { slot, part })
    }
}

/// A security question and its answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPair {
    pub question: String,
    pub answer: String,
}

impl RecoveryPair {
    /// Both halves are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.question.is_empty() && !self.answer.is_empty()
    }
}

/// The in-progress registration record, posted as-is to `/register`.
#[derive(Debug, Serialize)]
pub struct RegistrationRecord {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
    pub phone_number: String,
    pub education: String,
    /// Data URL of the profile image; empty until captured.
    pub photo: String,
    pub skills: Vec<String>,
    pub recovery_q1: RecoveryPair,
    pub recovery_q2: RecoveryPair,
}

fn expose_password<S: Serializer>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret())
}

impl Clone for RegistrationRecord {
    fn clone(&self) -> Self {
        Self {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            email: self.email.clone(),
            password: SecretString::from(self.password.expose_secret().to_string()),
            phone_number: self.phone_number.clone(),
            education: self.education.clone(),
            photo: self.photo.clone(),
            skills: self.skills.clone(),
            recovery_q1: self.recovery_q1.clone(),
            recovery_q2: self.recovery_q2.clone(),
        }
    }
}

impl Default for RegistrationRecord {
    fn default() -> Self {
        Self {
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            gender: String::new(),
            email: String::new(),
            password: SecretString::from(String::new()),
            phone_number: String::new(),
            education: String::new(),
            photo: String::new(),
            skills: Vec::new(),
            recovery_q1: RecoveryPair::default(),
            recovery_q2: RecoveryPair::default(),
        }
    }
}

impl RegistrationRecord {
    /// Read an identity field. The password is exposed; callers must not log it.
    pub fn identity(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::Username => &self.username,
            IdentityField::FirstName => &self.first_name,
            IdentityField::LastName => &self.last_name,
            IdentityField::Gender => &self.gender,
            IdentityField::Email => &self.email,
            IdentityField::Password => self.password.expose_secret(),
            IdentityField::PhoneNumber => &self.phone_number,
            IdentityField::Education => &self.education,
        }
    }

    pub fn recovery(&self, slot: RecoverySlot) -> &RecoveryPair {
        match slot {
            RecoverySlot::First => &self.recovery_q1,
            RecoverySlot::Second => &self.recovery_q2,
        }
    }

    fn recovery_mut(&mut self, slot: RecoverySlot) -> &mut RecoveryPair {
        match slot {
            RecoverySlot::First => &mut self.recovery_q1,
            RecoverySlot::Second => &mut self.recovery_q2,
        }
    }

    /// Overwrite one field. Unfiltered: question exclusivity is the
    /// selector's job, not this setter's.
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Identity(id) => match id {
                IdentityField::Username => self.username = value,
                IdentityField::FirstName => self.first_name = value,
                IdentityField::LastName => self.last_name = value,
                IdentityField::Gender => self.gender = value,
                IdentityField::Email => self.email = value,
                IdentityField::Password => self.password = SecretString::from(value),
                IdentityField::PhoneNumber => self.phone_number = value,
                IdentityField::Education => self.education = value,
            },
            FormField::Photo => self.photo = value,
            FormField::Recovery { slot, part } => {
                let pair = self.recovery_mut(slot);
                match part {
                    RecoveryPart::Question => pair.question = value,
                    RecoveryPart::Answer => pair.answer = value,
                }
            }
        }
    }

    /// Fields blocking the first page: empty identity fields, then photo.
    pub fn missing_basic_info(&self) -> Vec<FormField> {
        let mut missing: Vec<FormField> = IdentityField::ALL
            .iter()
            .filter(|f| self.identity(**f).is_empty())
            .map(|f| FormField::Identity(*f))
            .collect();
        if self.photo.is_empty() {
            missing.push(FormField::Photo);
        }
        missing
    }

    pub fn recovery_complete(&self) -> bool {
        self.recovery_q1.is_complete() && self.recovery_q2.is_complete()
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}
