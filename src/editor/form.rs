//! Editable form state.
//!
//! Values are kept as the raw text a user typed, and only coerced when a
//! placement is needed for drawing or storage.

use std::fmt;
use std::str::FromStr;

use crate::placement::{lenient::parse_int, Placement, DEFAULT_SIZE};

/// An editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    X,
    Y,
    FontFamily,
    FontSize,
    Color,
    /// Transient preview text; never persisted.
    PreviewText,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::X,
        Field::Y,
        Field::FontFamily,
        Field::FontSize,
        Field::Color,
        Field::PreviewText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::FontFamily => "font",
            Field::FontSize => "size",
            Field::Color => "color",
            Field::PreviewText => "text",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Field::X),
            "y" => Ok(Field::Y),
            "font" | "family" => Ok(Field::FontFamily),
            "size" => Ok(Field::FontSize),
            "color" | "colour" => Ok(Field::Color),
            "text" | "preview" => Ok(Field::PreviewText),
            _ => Err(format!("Unknown field '{}'", s)),
        }
    }
}

/// Current values of the editor's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub x: String,
    pub y: String,
    pub font: String,
    pub size: String,
    pub color: String,
    pub preview_text: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::from_placement(&Placement::centered(0, 0), "")
    }
}

impl Form {
    pub fn from_placement(placement: &Placement, preview_text: &str) -> Self {
        Self {
            x: placement.x.to_string(),
            y: placement.y.to_string(),
            font: placement.font.clone(),
            size: placement.size.to_string(),
            color: placement.color.clone(),
            preview_text: preview_text.to_string(),
        }
    }

    /// Show `placement`, keeping the preview text.
    pub fn apply(&mut self, placement: &Placement) {
        let preview_text = std::mem::take(&mut self.preview_text);
        *self = Self::from_placement(placement, &preview_text);
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::X => &self.x,
            Field::Y => &self.y,
            Field::FontFamily => &self.font,
            Field::FontSize => &self.size,
            Field::Color => &self.color,
            Field::PreviewText => &self.preview_text,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::X => self.x = value,
            Field::Y => self.y = value,
            Field::FontFamily => self.font = value,
            Field::FontSize => self.size = value,
            Field::Color => self.color = value,
            Field::PreviewText => self.preview_text = value,
        }
    }

    /// The placement the form currently shows.
    ///
    /// Non-numeric coordinates coerce to 0 and a non-numeric size to the
    /// default size.
    pub fn placement(&self) -> Placement {
        Placement {
            x: parse_int(&self.x).unwrap_or(0),
            y: parse_int(&self.y).unwrap_or(0),
            font: self.font.clone(),
            size: parse_int(&self.size).unwrap_or(DEFAULT_SIZE),
            color: self.color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_names_roundtrip() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>(), Ok(field));
        }
        assert!("width".parse::<Field>().is_err());
    }

    #[test]
    fn test_placement_coerces_bad_numbers() {
        let mut form = Form::default();
        form.set(Field::X, "abc");
        form.set(Field::Y, "17.6");
        form.set(Field::FontSize, "");

        let placement = form.placement();
        assert_eq!(placement.x, 0);
        assert_eq!(placement.y, 17);
        assert_eq!(placement.size, 24);
    }

    #[test]
    fn test_apply_keeps_preview_text() {
        let mut form = Form::default();
        form.set(Field::PreviewText, "No. 42");
        form.apply(&Placement::centered(100, 40));

        assert_eq!(form.preview_text, "No. 42");
        assert_eq!(form.x, "50");
        assert_eq!(form.y, "20");
        assert_eq!(form.font, "Arial");
    }
}
