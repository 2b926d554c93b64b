// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message_text: String,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self { message_text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.message_text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.message_text = text.into();
    }
}

// A null text is accepted and read as empty.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct AuthorizedQuery {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorizedResponse {
    pub code: String,
}
