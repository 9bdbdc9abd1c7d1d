use serde::{Deserialize, Serialize};

/// Body of a failed ask response. The service may omit `error` entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AskErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Service-provided message; an empty string counts as absent.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_error_field_parses_to_none() {
        let body: AskErrorBody = serde_json::from_str("{}").expect("parse");
        assert_eq!(body.message(), None);
    }

    #[test]
    fn empty_error_field_is_treated_as_absent() {
        let body: AskErrorBody = serde_json::from_str(r#"{"error": ""}"#).expect("parse");
        assert_eq!(body.message(), None);
    }

    #[test]
    fn error_message_survives_serialization() {
        let raw = serde_json::to_string(&AskErrorBody::new("bad request")).expect("serialize");
        assert_eq!(raw, r#"{"error":"bad request"}"#);
    }
}
