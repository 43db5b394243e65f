//! Terminal output for the CLI.
//!
//! Human-readable output goes to stderr with optional color. Machine-readable
//! `--json` output goes to stdout via [`Renderer::json`].

use crossterm::style::{Color, Stylize};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Glyphs / labels / colors
// ---------------------------------------------------------------------------

const INDENT_1: &str = "  ";
const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";
const GLYPH_SECTION_BULLET: &str = "•";
const GLYPH_ACTIVE: &str = "●";
const GLYPH_INACTIVE: &str = "○";
const GLYPH_ACTIVE_PLAIN: &str = "*";
const GLYPH_INACTIVE_PLAIN: &str = " ";

const COLOR_WARNING: Color = Color::Yellow;
const COLOR_ERROR: Color = Color::Red;
const COLOR_SUCCESS: Color = Color::Green;
const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
const COLOR_SECTION_TITLE: Color = Color::Cyan;
const COLOR_FIELD_KEY: Color = Color::DarkGrey;
const COLOR_FIELD_VALUE: Color = Color::White;
const COLOR_ACTIVE: Color = Color::Green;
const COLOR_INACTIVE: Color = Color::DarkGrey;

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print a small section header.
    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                GLYPH_SECTION_BULLET.with(COLOR_SECTION_BULLET),
                title.with(COLOR_SECTION_TITLE).bold()
            );
        } else {
            eprintln!("{title}:");
        }
    }

    /// Print a key/value line under a section.
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{INDENT_1}{} {}",
                format!("{key}:").with(COLOR_FIELD_KEY),
                value.with(COLOR_FIELD_VALUE),
            );
        } else {
            eprintln!("{INDENT_1}{key}: {value}");
        }
    }

    /// Print a simple indented detail line.
    pub fn detail(&self, text: &str) {
        if self.color {
            eprintln!("{INDENT_1}{}", text.with(COLOR_FIELD_VALUE));
        } else {
            eprintln!("{INDENT_1}{text}");
        }
    }

    /// Print one profile row in a listing.
    pub fn profile_row(&self, active: bool, name: &str, id: &str, detail: &str) {
        if self.color {
            let (glyph, tint) = if active {
                (GLYPH_ACTIVE, COLOR_ACTIVE)
            } else {
                (GLYPH_INACTIVE, COLOR_INACTIVE)
            };
            let styled_name = if active {
                name.with(COLOR_ACTIVE).bold()
            } else {
                name.with(COLOR_FIELD_VALUE)
            };
            eprintln!(
                "{INDENT_1}{} {} {} {}",
                glyph.with(tint),
                styled_name,
                format!("({id})").with(COLOR_FIELD_KEY),
                detail.with(COLOR_FIELD_KEY),
            );
        } else {
            let glyph = if active {
                GLYPH_ACTIVE_PLAIN
            } else {
                GLYPH_INACTIVE_PLAIN
            };
            eprintln!("{INDENT_1}{glyph} {name} ({id}) {detail}");
        }
    }

    /// Print a completed-action line.
    pub fn success(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                GLYPH_SECTION_BULLET.with(COLOR_SUCCESS),
                msg.with(COLOR_SUCCESS).bold()
            );
        } else {
            eprintln!("{msg}");
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_WARNING.with(COLOR_WARNING).bold());
        } else {
            eprintln!("{LABEL_WARNING} {msg}");
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_ERROR.with(COLOR_ERROR).bold());
        } else {
            eprintln!("{LABEL_ERROR} {msg}");
        }
    }

    /// Pretty-print `value` as JSON on stdout.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<(), serde_json::Error> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
