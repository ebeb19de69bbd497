//! Connection URL construction for the RELINK backend.

use crate::identity::Identity;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in a path segment.
///
/// Matches JavaScript's `encodeURIComponent`: everything but alphanumerics
/// and `- _ . ~ ! * ' ( )` is percent-encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Builds the WebSocket URL for an identity: `<base>/<room>/<username>` when
/// the session is room-scoped, `<base>/<username>` otherwise.
pub fn session_url(base: &str, identity: &Identity) -> String {
    let base = base.trim_end_matches('/');
    match &identity.room {
        Some(room) => format!("{base}/{}/{}", encode(room), encode(&identity.username)),
        None => format!("{base}/{}", encode(&identity.username)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "wss://relink-backend1.onrender.com/ws";

    #[test]
    fn solo_url_appends_username() {
        let identity = Identity::new("alice", None).unwrap();
        assert_eq!(
            session_url(BASE, &identity),
            "wss://relink-backend1.onrender.com/ws/alice"
        );
    }

    #[test]
    fn room_segment_precedes_username() {
        let identity = Identity::new("a b", Some("r1")).unwrap();
        assert_eq!(
            session_url(BASE, &identity),
            "wss://relink-backend1.onrender.com/ws/r1/a%20b"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let identity = Identity::new("alice", None).unwrap();
        assert_eq!(
            session_url("ws://localhost:8000/ws/", &identity),
            "ws://localhost:8000/ws/alice"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let identity = Identity::new("a/b?c", Some("room#1")).unwrap();
        assert_eq!(session_url(BASE, &identity), format!("{BASE}/room%231/a%2Fb%3Fc"));
    }

    #[test]
    fn unreserved_characters_pass_through() {
        let identity = Identity::new("a-b_c.d~e!f", None).unwrap();
        assert_eq!(session_url(BASE, &identity), format!("{BASE}/a-b_c.d~e!f"));
    }

    #[test]
    fn non_ascii_is_utf8_percent_encoded() {
        let identity = Identity::new("café", None).unwrap();
        assert_eq!(session_url(BASE, &identity), format!("{BASE}/caf%C3%A9"));
    }
}
