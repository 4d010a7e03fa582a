//! Line commands for driving the editor from a terminal or a script.
//!
//! ```text
//! select approved.png
//! text A-2024-117
//! click 412 230 824 460
//! size 32
//! save
//! wait
//! render preview.png
//! ```

use std::path::PathBuf;

use super::{Field, Message};

/// One parsed input line.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Forward to the editor.
    Editor(EditorCommand),
    /// Write the current surface to a PNG file.
    Render(PathBuf),
    /// Print the current selection, form and status.
    Show,
    /// Print the stamp list.
    Stamps,
    /// Wait for all outstanding backend requests.
    Wait,
    Help,
    Quit,
}

/// A command that maps directly onto a [`Message`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    Select(String),
    Edit(Field, String),
    Click {
        x: f64,
        y: f64,
        display: Option<(f64, f64)>,
    },
    Save,
}

impl EditorCommand {
    /// Build the message. Clicks without an on-screen size use the surface's
    /// intrinsic size, i.e. no scaling.
    pub fn into_message(self, surface_size: (u32, u32)) -> Message {
        match self {
            EditorCommand::Select(name) => Message::SelectStamp(name),
            EditorCommand::Edit(field, value) => Message::EditField(field, value),
            EditorCommand::Click { x, y, display } => {
                let (display_width, display_height) = display
                    .unwrap_or((surface_size.0 as f64, surface_size.1 as f64));
                Message::ClickPlace {
                    pixel_x: x,
                    pixel_y: y,
                    display_width,
                    display_height,
                }
            }
            EditorCommand::Save => Message::Save,
        }
    }
}

pub const HELP: &str = "\
commands:
  stamps                      list stamps
  select <name>               edit a stamp
  x <v> | y <v>               set the text point
  font <family>               set the font family
  size <v>                    set the font size
  color <v>                   set the text color
  text <preview>              set the preview text (not saved)
  click <px> <py> [<w> <h>]   place the point from an on-screen click
  save                        save all placements
  wait                        wait for pending requests
  render <file.png>           write the current preview
  show                        print the current state
  quit";

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "select" => Command::Editor(EditorCommand::Select(required(word, rest)?)),
            "click" => Command::Editor(parse_click(rest)?),
            "save" => Command::Editor(EditorCommand::Save),
            "render" => Command::Render(PathBuf::from(required(word, rest)?)),
            "show" => Command::Show,
            "stamps" => Command::Stamps,
            "wait" => Command::Wait,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            // Preview text may be cleared with a bare `text`
            "text" | "preview" => {
                Command::Editor(EditorCommand::Edit(Field::PreviewText, rest.to_string()))
            }
            other => {
                let field: Field = other
                    .parse()
                    .map_err(|_| format!("Unknown command '{}' (try 'help')", other))?;
                Command::Editor(EditorCommand::Edit(field, required(word, rest)?))
            }
        };

        Ok(Some(command))
    }
}

fn required(word: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("'{}' needs a value", word))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_click(rest: &str) -> Result<EditorCommand, String> {
    let numbers = rest
        .split_whitespace()
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("'{}' is not a number", s))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match numbers.as_slice() {
        [x, y] => Ok(EditorCommand::Click {
            x: *x,
            y: *y,
            display: None,
        }),
        [x, y, width, height] => Ok(EditorCommand::Click {
            x: *x,
            y: *y,
            display: Some((*width, *height)),
        }),
        _ => Err("usage: click <px> <py> [<width> <height>]".to_string()),
    }
}
