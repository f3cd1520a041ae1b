//! Contact form state
//!
//! `ContactFlow` guards the form the same way the page did: one submission
//! at a time, a success banner that hides itself, and an error that keeps
//! what the visitor typed.

use std::time::Duration;

use tracing::debug;

use crate::error::{ContactError, RelayError};

/// How long the success banner stays up before the form comes back.
pub const SUCCESS_BANNER: Duration = Duration::from_secs(5);

pub const SEND_ERROR: &str = "Error sending message. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Field names and values in form order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("subject", self.subject.as_str()),
            ("message", self.message.as_str()),
        ]
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ContactError::MissingFields(missing));
        }

        let email = self.email.trim();
        let valid = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        };
        if !valid {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }

        Ok(())
    }

    pub fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
        }
    }

    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactField {
    #[default]
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub fn all() -> [ContactField; 4] {
        [Self::Name, Self::Email, Self::Subject, Self::Message]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Subject,
            Self::Subject => Self::Message,
            Self::Message => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Subject => Self::Email,
            Self::Message => Self::Subject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContactStatus {
    #[default]
    Editing,
    Sending,
    Sent,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ContactFlow {
    pub form: ContactForm,
    pub focus: ContactField,
    status: ContactStatus,
    // time the success banner has been showing
    banner_elapsed: Duration,
}

impl ContactFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ContactStatus {
        &self.status
    }

    pub fn is_sending(&self) -> bool {
        self.status == ContactStatus::Sending
    }

    /// Validate and hand back the form to send. The flow stays in
    /// `Sending` until [`ContactFlow::finish`].
    pub fn begin_submit(&mut self) -> Result<ContactForm, ContactError> {
        if self.is_sending() {
            return Err(ContactError::InFlight);
        }
        self.form.validate()?;
        debug!("contact form submitting");
        self.status = ContactStatus::Sending;
        Ok(self.form.clone())
    }

    pub fn finish(&mut self, outcome: Result<(), RelayError>) {
        match outcome {
            Ok(()) => {
                self.form = ContactForm::default();
                self.focus = ContactField::Name;
                self.banner_elapsed = Duration::ZERO;
                self.status = ContactStatus::Sent;
            }
            Err(e) => {
                debug!(error = %e, "contact form failed");
                self.status = ContactStatus::Failed(SEND_ERROR.to_string());
            }
        }
    }

    /// Count down the success banner; back to editing after [`SUCCESS_BANNER`].
    pub fn expire_banner(&mut self, elapsed: Duration) {
        if self.status != ContactStatus::Sent {
            return;
        }
        self.banner_elapsed += elapsed;
        if self.banner_elapsed >= SUCCESS_BANNER {
            self.status = ContactStatus::Editing;
        }
    }

    /// Any edit after a failure dismisses the error.
    pub fn acknowledge(&mut self) {
        if matches!(self.status, ContactStatus::Failed(_)) {
            self.status = ContactStatus::Editing;
        }
    }
}
