use std::str::FromStr;

use crate::message::Message;

pub const CREATED_PREFIX: &str = "Message created: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Return the submitted message unchanged.
    Echo,
    /// Return a new message prefixed with [`CREATED_PREFIX`].
    Prefix,
}

impl FromStr for CreateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" => Ok(CreateMode::Echo),
            "prefix" | "transform" => Ok(CreateMode::Prefix),
            other => Err(format!("unknown message mode: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageService {
    presets: Vec<Message>,
    mode: CreateMode,
}

impl MessageService {
    pub fn new(presets: impl IntoIterator<Item = String>, mode: CreateMode) -> Self {
        Self {
            presets: presets.into_iter().map(Message::new).collect(),
            mode,
        }
    }

    pub fn list(&self) -> Vec<Message> {
        self.presets.clone()
    }

    pub fn create(&self, input: Message) -> Message {
        tracing::info!("{}{}", CREATED_PREFIX, input.text());
        match self.mode {
            CreateMode::Echo => input,
            CreateMode::Prefix => Message::new(format!("{}{}", CREATED_PREFIX, input.text())),
        }
    }
}
