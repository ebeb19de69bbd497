//! The log-line rendering contract and the per-actor color assignment.

use crate::protocol::InboundEvent;
use chrono::{DateTime, Local};
use rand::Rng;
use std::collections::HashMap;

/// Per-actor color assignments.
///
/// A random hue is drawn once per actor on first sight and is stable for the
/// lifetime of the palette, so a given actor keeps one color across the whole
/// session log.
#[derive(Debug, Default)]
pub struct Palette {
    hues: HashMap<String, u16>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hue (degrees, `0..360`) assigned to an actor.
    pub fn hue(&mut self, actor: &str) -> u16 {
        *self
            .hues
            .entry(actor.to_string())
            .or_insert_with(|| rand::rng().random_range(0..360))
    }

    /// The actor's color as a CSS `hsl(...)` value.
    pub fn color(&mut self, actor: &str) -> String {
        format!("hsl({}, 70%, 50%)", self.hue(actor))
    }

    /// Number of actors seen so far.
    pub fn len(&self) -> usize {
        self.hues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hues.is_empty()
    }
}

/// Escapes `& < > " '` so actor-supplied text cannot inject markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats an ISO8601 stamp in the viewer's local time.
///
/// An unparseable stamp falls back to the raw string; a bad timestamp is
/// never fatal to rendering.
pub fn local_time(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        Err(_) => ts.to_string(),
    }
}

/// Which style of log line an event rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    System,
    User,
}

/// One rendered log line: an HTML fragment plus the class of its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub html: String,
}

impl RenderedLine {
    /// CSS class for the line's container element.
    pub fn class(&self) -> &'static str {
        match self.kind {
            LineKind::System => "msg system",
            LineKind::User => "msg user",
        }
    }
}

/// Renders an inbound event to an HTML log line.
///
/// System events render as plain `[localTime] text`. Message events render a
/// color-coded actor label, a colon, the message text, and a trailing local
/// time stamp. Actor names and message text are HTML-escaped; timestamps and
/// class names are locally constructed and are not.
pub fn render_html(event: &InboundEvent, palette: &mut Palette) -> RenderedLine {
    match event {
        InboundEvent::System { text, ts } => RenderedLine {
            kind: LineKind::System,
            html: format!("[{}] {}", local_time(ts), escape_html(text)),
        },
        InboundEvent::Message { actor, text, ts } => RenderedLine {
            kind: LineKind::User,
            html: format!(
                "<b style=\"color:{}\">{}</b>: {} <span class=\"ts\">{}</span>",
                palette.color(actor),
                escape_html(actor),
                escape_html(text),
                local_time(ts),
            ),
        },
    }
}
