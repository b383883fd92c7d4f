//! Wire protocol between the OS-side accessibility bridge and the daemon.
//!
//! Newline-delimited JSON, one event per line, one verdict per line back.
//! The bridge owns both side effects: capturing the snapshot before sending
//! and performing the back command when told to.

use serde::{Deserialize, Serialize};

use crate::rules::Action;
use crate::ui::tree::UiNode;

/// One accessibility event from the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tree: Option<UiNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    None,
    Back,
}

impl From<Action> for Verdict {
    fn from(action: Action) -> Self {
        match action {
            Action::NavigateBack => Verdict::Back,
        }
    }
}

/// The daemon's reply for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub action: Verdict,
    /// Name of the rule that fired, present only on `back` verdicts.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl EventResponse {
    pub fn none() -> Self {
        Self {
            action: Verdict::None,
            rule: None,
            error: None,
        }
    }

    pub fn matched(action: Action, rule: &str) -> Self {
        Self {
            action: action.into(),
            rule: Some(rule.to_string()),
            error: None,
        }
    }

    /// Unparseable input still gets a verdict: no match, with a note.
    pub fn parse_error(message: String) -> Self {
        Self {
            action: Verdict::None,
            rule: None,
            error: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_request_wire_shape() {
        let request: EventRequest = serde_json::from_str(
            r#"{"packageName": "com.instagram.android", "tree": {"label": "Reels", "selected": true}}"#,
        )
        .unwrap();
        assert_eq!(request.package_name.as_deref(), Some("com.instagram.android"));
        let tree = request.tree.unwrap();
        assert_eq!(tree.label.as_deref(), Some("Reels"));
        assert!(tree.selected);
    }

    #[test]
    fn test_empty_event_is_valid() {
        let request: EventRequest = serde_json::from_str("{}").unwrap();
        assert!(request.package_name.is_none());
        assert!(request.tree.is_none());
    }

    #[test]
    fn test_back_verdict_names_the_rule() {
        let response = EventResponse::matched(Action::NavigateBack, "reels");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["action"], "back");
        assert_eq!(json["rule"], "reels");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_none_verdict_omits_rule() {
        let json = serde_json::to_value(EventResponse::none()).unwrap();
        assert_eq!(json["action"], "none");
        assert!(json.get("rule").is_none());
    }

    #[test]
    fn test_parse_error_verdict_is_none_with_note() {
        let response = EventResponse::parse_error("Parse error: bad input".to_string());
        assert_eq!(response.action, Verdict::None);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["action"], "none");
        assert!(json["error"].as_str().unwrap().contains("Parse error"));
    }
}
