use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::Client;
use tracing::{debug, warn};

use crate::contact::ContactForm;
use crate::error::RelayError;

pub const CHAT_MESSAGE_LABEL: &str = "Chatbot direct message: ";
pub const CHAT_SUBJECT: &str = "Direct Message from Portfolio Chatbot";

/// Ordered form fields for one relay POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayPayload {
    fields: Vec<(String, String)>,
}

impl RelayPayload {
    pub fn chat_message(content: &str) -> Self {
        Self {
            fields: vec![
                ("message".to_string(), format!("{CHAT_MESSAGE_LABEL}{content}")),
                ("_subject".to_string(), CHAT_SUBJECT.to_string()),
            ],
        }
    }

    pub fn contact(form: &ContactForm) -> Self {
        let fields = form
            .fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_form(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
    }
}

/// Posts multipart forms to the third-party relay that turns them into email.
#[derive(Clone)]
pub struct FormRelayClient {
    client: Client,
    contact_url: String,
    chat_url: String,
}

impl FormRelayClient {
    pub fn new(contact_url: &str, chat_url: &str) -> Self {
        Self::with_client(Client::new(), contact_url, chat_url)
    }

    pub fn with_client(client: Client, contact_url: &str, chat_url: &str) -> Self {
        Self {
            client,
            contact_url: contact_url.to_string(),
            chat_url: chat_url.to_string(),
        }
    }

    pub async fn send_chat(&self, content: &str) -> Result<(), RelayError> {
        self.post(&self.chat_url, RelayPayload::chat_message(content))
            .await
    }

    pub async fn send_contact(&self, form: &ContactForm) -> Result<(), RelayError> {
        self.post(&self.contact_url, RelayPayload::contact(form))
            .await
    }

    async fn post(&self, url: &str, payload: RelayPayload) -> Result<(), RelayError> {
        debug!(url, fields = payload.fields().len(), "posting to relay");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .multipart(payload.into_form())
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "relay unreachable");
                RelayError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "relay rejected submission");
            return Err(RelayError::Rejected(status));
        }

        Ok(())
    }
}
