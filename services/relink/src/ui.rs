//! Terminal rendering of session events, plus the HTML transcript.

use colored::Colorize;
use relink_client::{
    Palette,
    protocol::InboundEvent,
    render::{self, RenderedLine},
};
use std::path::Path;

/// The message log: prints each event to the terminal as it arrives and
/// keeps the HTML rendition for the transcript export. Strictly append-only,
/// in arrival order.
pub struct Ui {
    palette: Palette,
    color: bool,
    transcript: Vec<RenderedLine>,
}

impl Ui {
    pub fn new(color: bool) -> Self {
        Self {
            palette: Palette::new(),
            color,
            transcript: Vec::new(),
        }
    }

    /// Renders one event: a line on stdout and an entry in the transcript.
    pub fn show(&mut self, event: &InboundEvent) {
        let line = self.terminal_line(event);
        println!("{line}");
        let html = render::render_html(event, &mut self.palette);
        self.transcript.push(html);
    }

    fn terminal_line(&mut self, event: &InboundEvent) -> String {
        match event {
            InboundEvent::System { text, ts } => {
                let line = format!("[{}] {}", render::local_time(ts), text);
                if self.color {
                    line.dimmed().to_string()
                } else {
                    line
                }
            }
            InboundEvent::Message { actor, text, ts } => {
                let stamp = render::local_time(ts);
                if self.color {
                    let (r, g, b) = hsl_to_rgb(self.palette.hue(actor));
                    format!(
                        "{}: {} {}",
                        actor.truecolor(r, g, b).bold(),
                        text,
                        stamp.dimmed()
                    )
                } else {
                    format!("{actor}: {text} {stamp}")
                }
            }
        }
    }

    /// Drops the accumulated log, as leaving a room does.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Number of lines in the transcript so far.
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    /// Writes the transcript as a standalone HTML file.
    pub fn write_transcript(&self, path: &Path) -> std::io::Result<()> {
        let mut out = String::from(
            "<!doctype html>\n<meta charset=\"utf-8\">\n<title>RELINK transcript</title>\n<div class=\"messages\">\n",
        );
        for line in &self.transcript {
            out.push_str(&format!(
                "  <div class=\"{}\">{}</div>\n",
                line.class(),
                line.html
            ));
        }
        out.push_str("</div>\n");
        std::fs::write(path, out)
    }
}

/// Converts a palette hue to RGB at the palette's fixed saturation (70%) and
/// lightness (50%).
fn hsl_to_rgb(hue: u16) -> (u8, u8, u8) {
    const S: f32 = 0.70;
    const L: f32 = 0.50;
    let c = (1.0 - (2.0 * L - 1.0).abs()) * S;
    let h = f32::from(hue % 360) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = L - c / 2.0;
    (channel(r + m), channel(g + m), channel(b + m))
}

fn channel(v: f32) -> u8 {
    (v * 255.0).round() as u8
}
