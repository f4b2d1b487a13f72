//! Selections over the scene's dependent attribute levels.
//!
//! A [`Selection`] is filled strictly left to right: lighting first, then
//! camera, format and finally ISO. The only way to grow one is
//! [`Selection::with_next`], which always sets the next unset level, so a
//! selection with a gap cannot be constructed.

use std::fmt;

use thiserror::Error;

use crate::api::AttributeValue;

/// One level of the scene's attribute hierarchy, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Lighting scenario (daylight, low light, ...).
    Lighting,
    /// Camera model.
    Camera,
    /// Capture format (JPEG or RAW).
    Format,
    /// ISO sensitivity.
    Iso,
}

impl Level {
    /// All levels, outermost first.
    pub const ALL: [Level; 4] = [Level::Lighting, Level::Camera, Level::Format, Level::Iso];

    /// Fixed attribute instance identifier the API expects for this level.
    #[must_use]
    pub const fn instance_id(self) -> u32 {
        match self {
            Level::Lighting => 18,
            Level::Camera => 13,
            Level::Format => 15,
            Level::Iso => 16,
        }
    }

    /// Position of this level's group in a response's `attributes` array.
    #[must_use]
    pub const fn attribute_index(self) -> usize {
        match self {
            Level::Lighting => 0,
            Level::Camera => 1,
            Level::Format => 2,
            Level::Iso => 3,
        }
    }

    /// Lowercase name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Level::Lighting => "lighting",
            Level::Camera => "camera",
            Level::Format => "format",
            Level::Iso => "iso",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised when growing a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Every level is already set.
    #[error("selection is already complete (iso = {iso})")]
    Complete {
        /// The ISO value of the complete selection.
        iso: String,
    },
}

/// A chosen value at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Choice {
    value: String,
    display: String,
}

/// An ordered lighting/camera/format/ISO tuple, set left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    choices: Vec<Choice>,
}

impl Selection {
    /// Creates an empty selection (no level set).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this selection with the next unset level set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Complete`] when all four levels are set.
    pub fn with_next(&self, value: &AttributeValue) -> Result<Self, SelectionError> {
        if self.is_leaf() {
            return Err(SelectionError::Complete {
                iso: self.value(Level::Iso).unwrap_or_default().to_string(),
            });
        }
        Ok(self.extended(value))
    }

    /// One child selection per value, in order. A leaf has no children, so
    /// this is empty when all four levels are already set.
    #[must_use]
    pub fn children(&self, values: &[AttributeValue]) -> Vec<Selection> {
        if self.is_leaf() {
            return Vec::new();
        }
        values.iter().map(|value| self.extended(value)).collect()
    }

    fn extended(&self, value: &AttributeValue) -> Self {
        let mut choices = self.choices.clone();
        choices.push(Choice {
            value: value.client_value.clone(),
            display: value.display_name().to_string(),
        });
        Self { choices }
    }

    /// Number of levels set.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.choices.len()
    }

    /// The next level to be set, or `None` for a leaf.
    #[must_use]
    pub fn next_level(&self) -> Option<Level> {
        Level::ALL.get(self.depth()).copied()
    }

    /// Whether all four levels are set.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.depth() == Level::ALL.len()
    }

    /// Machine value sent to the API for `level`, if set.
    #[must_use]
    pub fn value(&self, level: Level) -> Option<&str> {
        self.choices
            .get(level.attribute_index())
            .map(|choice| choice.value.as_str())
    }

    /// Human-readable name for `level`, if set.
    #[must_use]
    pub fn display(&self, level: Level) -> Option<&str> {
        self.choices
            .get(level.attribute_index())
            .map(|choice| choice.display.as_str())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.choices.iter().map(|c| c.value.as_str()).collect();
        write!(f, "[{}]", values.join(" / "))
    }
}
