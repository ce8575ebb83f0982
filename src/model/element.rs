//! The renderer-agnostic display unit produced by every widget.

use super::Color;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Horizontal placement hint for an [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

/// One renderable block of a status line.
///
/// Field names follow the i3bar protocol so that streaming producers can emit their
/// records directly in that format. Every field except `full_text` is optional and
/// omitted from the JSON when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Disambiguates several elements produced by the same widget.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    #[serde(default, rename = "align", skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Align>,
    #[serde(default)]
    pub full_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Color>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub min_width: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub separator: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub separator_block_width: u32,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Element {
    pub fn new(name: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_text: full_text.into(),
            ..Default::default()
        }
    }

    /// The element shown in place of a widget that failed permanently.
    pub fn error(err: impl Display) -> Self {
        Self {
            name: "error".to_string(),
            alignment: Some(Align::Right),
            color: Some(Color::ALERT),
            full_text: format!("ERROR: {err}"),
            ..Default::default()
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_alignment(mut self, alignment: Align) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}
