use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::participant::{gender_icon, Profile};

/// Everything a client may send over the socket, tagged the way the browser
/// sends it: `{"type":"find-match","name":...}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    FindMatch {
        #[serde(flatten)]
        profile: Profile,
    },
    SendMessage {
        content: Value,
    },
    TypingStart,
    TypingStop,
    MessageStatus {
        #[serde(rename = "partnerId")]
        partner_id: Uuid,
        #[serde(flatten)]
        payload: Value,
    },
    EndChat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    UserCount {
        count: usize,
    },
    Status {
        message: String,
        count: usize,
    },
    MatchFound {
        #[serde(rename = "partnerId")]
        partner_id: Uuid,
        #[serde(flatten)]
        profile: Profile,
        icon: &'static str,
    },
    ReceiveMessage {
        content: Value,
    },
    TypingStart,
    TypingStop,
    MessageSeen {
        #[serde(rename = "partnerId")]
        partner_id: Uuid,
        #[serde(flatten)]
        payload: Value,
    },
    PartnerDisconnected,
}

impl ServerEvent {
    /// The icon shown next to the partner is derived from their gender, with
    /// a neutral fallback for anything that isn't "male"/"female".
    pub fn match_found(partner_id: Uuid, profile: Profile) -> Self {
        let icon = gender_icon(&profile.gender);
        ServerEvent::MatchFound {
            partner_id,
            profile,
            icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn find_match_defaults_gender() {
        let event: ClientEvent = serde_json::from_value(json!({
            "type": "find-match",
            "name": "Ravi",
            "age": 27,
            "city": "Delhi",
        }))
        .unwrap();
        let ClientEvent::FindMatch { profile } = event else {
            panic!("expected find-match");
        };
        assert_eq!(profile.gender, "Other");
    }

    #[test]
    fn message_status_keeps_extra_fields() {
        let id = Uuid::now_v7();
        let event: ClientEvent = serde_json::from_value(json!({
            "type": "message-status",
            "partnerId": id,
            "messageId": 42,
            "status": "seen",
        }))
        .unwrap();
        let ClientEvent::MessageStatus { partner_id, payload } = event else {
            panic!("expected message-status");
        };
        assert_eq!(partner_id, id);
        assert_eq!(payload["messageId"], 42);
        assert_eq!(payload["status"], "seen");
    }

    #[test]
    fn user_count_wire_shape() {
        let text = serde_json::to_value(ServerEvent::UserCount { count: 3 }).unwrap();
        assert_eq!(text, json!({"type": "user-count", "count": 3}));
    }

    #[test]
    fn match_found_carries_icon() {
        let id = Uuid::now_v7();
        let event = ServerEvent::match_found(
            id,
            Profile {
                name: "Asha".to_owned(),
                age: 24,
                gender: "female".to_owned(),
                city: "Pune".to_owned(),
            },
        );
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["type"], "match-found");
        assert_eq!(value["name"], "Asha");
        assert_eq!(value["icon"], "👩");
    }
}
