use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::event::ServerEvent;

/// Seeker-supplied attributes, frozen for the lifetime of one seek.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    #[serde(default = "default_gender")]
    pub gender: String,
    pub city: String,
}

fn default_gender() -> String {
    "Other".to_owned()
}

pub(crate) fn gender_icon(gender: &str) -> &'static str {
    match gender.to_lowercase().as_str() {
        "male" => "👨",
        "female" => "👩",
        _ => "👤",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    Idle,
    Waiting,
    Paired,
}

/// One live connection. `partner_id` is a lookup key, never a handle: the
/// partner may already be gone, so every use re-resolves it in the registry.
pub struct Participant {
    pub id: Uuid,
    pub tx: UnboundedSender<ServerEvent>,
    pub profile: Option<Profile>,
    pub state: PairState,
    pub partner_id: Option<Uuid>,
    pub room_id: Option<String>,
}

impl Participant {
    pub(crate) fn new(id: Uuid, tx: UnboundedSender<ServerEvent>) -> Self {
        Self {
            id,
            tx,
            profile: None,
            state: PairState::Idle,
            partner_id: None,
            room_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_is_case_insensitive() {
        assert_eq!(gender_icon("Male"), "👨");
        assert_eq!(gender_icon("FEMALE"), "👩");
        assert_eq!(gender_icon("Other"), "👤");
        assert_eq!(gender_icon("nonbinary"), "👤");
    }

    #[test]
    fn gender_defaults_when_absent() {
        let profile: Profile =
            serde_json::from_str(r#"{"name":"Asha","age":24,"city":"Pune"}"#).unwrap();
        assert_eq!(profile.gender, "Other");
    }
}
