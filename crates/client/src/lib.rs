//! Client library for the RELINK chat backend.
//!
//! The crate is organized around one component, [`ChatSession`], which owns a
//! single WebSocket connection and bridges it to an event channel a UI layer
//! subscribes to:
//!
//! - `identity`: the validated username/room pair a session connects as.
//! - `endpoint`: builds the percent-encoded connection URL.
//! - `protocol`: the JSON wire events and the tagged-result decode step.
//! - `session`: the connection lifecycle (Idle → Connecting → Open → Closed).
//! - `render`: the HTML log-line contract and the per-actor color palette.

pub mod endpoint;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod render;
pub mod session;

pub use error::ClientError;
pub use identity::Identity;
pub use protocol::{Decoded, InboundEvent, OutboundEvent, decode};
pub use render::Palette;
pub use session::{ChatSession, SessionEvent, SessionState};
