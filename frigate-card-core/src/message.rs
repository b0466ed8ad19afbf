use std::fmt;

use serde::Serialize;

pub const NO_MEDIA: &str = "No media to download";
pub const NO_EVENT_ID: &str = "Could not determine the event id of the media";
pub const SIGN_FAILED: &str = "Could not sign the download URL";
pub const NO_CAMERA_NAME: &str =
    "Could not determine the camera name, please set `frigate.camera_name`";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Info,
}

/// A message rendered in place of the card content.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

impl Message {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.text),
            Severity::Info => f.write_str(&self.text),
        }
    }
}

/// Holds at most one message.  The first message stays until cleared, except
/// that an error may displace an informational message.
#[derive(Clone, Debug, Default)]
pub struct MessageSlot {
    message: Option<Message>,
}

impl MessageSlot {
    /// Returns whether the message was taken.
    pub fn set(&mut self, message: Message) -> bool {
        let accept = match &self.message {
            None => true,
            Some(current) => message.is_error() && !current.is_error(),
        };
        if accept {
            self.message = Some(message);
        } else {
            log::debug!("message slot occupied, dropping {:?}", message.text);
        }
        accept
    }

    pub fn clear(&mut self) -> bool {
        self.message.take().is_some()
    }

    pub fn get(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}
