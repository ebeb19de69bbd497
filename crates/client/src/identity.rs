use crate::error::ClientError;

/// The identity a session connects as. Immutable once the session starts.
///
/// Room scoping is optional: a present room adds one leading path segment to
/// the connection URL and scopes the chat, an absent one joins the global
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub room: Option<String>,
}

impl Identity {
    /// Builds a trimmed identity, rejecting fields that are empty after
    /// trimming.
    pub fn new(username: &str, room: Option<&str>) -> Result<Self, ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClientError::MissingField("username"));
        }
        let room = match room {
            Some(room) => {
                let room = room.trim();
                if room.is_empty() {
                    return Err(ClientError::MissingField("room"));
                }
                Some(room.to_string())
            }
            None => None,
        };
        Ok(Self {
            username: username.to_string(),
            room,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_fields() {
        let identity = Identity::new("  alice ", Some(" lobby ")).unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.room.as_deref(), Some("lobby"));
    }

    #[test]
    fn room_is_optional() {
        let identity = Identity::new("alice", None).unwrap();
        assert_eq!(identity.room, None);
    }

    #[test]
    fn rejects_blank_username() {
        let err = Identity::new("   ", None).unwrap_err();
        assert!(matches!(err, ClientError::MissingField("username")));
    }

    #[test]
    fn rejects_blank_room() {
        let err = Identity::new("alice", Some("  ")).unwrap_err();
        assert!(matches!(err, ClientError::MissingField("room")));
    }
}
