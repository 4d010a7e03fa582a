//! # Editor Session
//!
//! Owns an [`Editor`] and performs its effects against a [`Backend`].
//!
//! Effects run as spawned tasks and report back over a channel, so the
//! session keeps accepting input while requests are in flight. Only the
//! session mutates the editor, one message at a time.

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::backend::Backend;
use crate::editor::{command::HELP, Command, Editor, Effect, Message};
use crate::error::StampError;
use crate::render;

/// An editor wired to a backend.
pub struct Session<B: Backend + 'static> {
    editor: Editor,
    backend: Arc<B>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
}

impl<B: Backend + 'static> Session<B> {
    pub fn new(editor: Editor, backend: B) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            editor,
            backend: Arc::new(backend),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Number of backend requests not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a message and start any effect it produces.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, message: Message) {
        if let Some(effect) = self.editor.update(message) {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        debug!(?effect, "Starting effect");
        self.in_flight += 1;

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let message = perform(backend.as_ref(), effect).await;
            // Receiver lives as long as the session
            let _ = tx.send(message);
        });
    }

    /// Wait for the next backend result and apply it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_result(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(message) => {
                self.in_flight -= 1;
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Apply results until no request is in flight, including any requests
    /// those results start.
    pub async fn settle(&mut self) {
        while self.next_result().await {}
    }

    /// Run the startup sequence to completion.
    pub async fn initialize(&mut self) {
        self.dispatch(Message::Initialize);
        self.settle().await;
    }
}

/// Perform one effect and turn its outcome into a message.
pub async fn perform<B: Backend + ?Sized>(backend: &B, effect: Effect) -> Message {
    match effect {
        Effect::FetchInitial => {
            // Sequential: the first image must render with its config
            let result = async {
                let stamps = backend.list_stamps().await?;
                let store = backend.load_config().await?;
                Ok::<_, StampError>((stamps, store))
            }
            .await;
            Message::Initialized(result)
        }
        Effect::LoadImage(name) => {
            let result = backend.load_image(&name).await;
            Message::ImageLoaded { name, result }
        }
        Effect::Submit(store) => Message::SaveFinished(backend.save_config(&store).await),
    }
}

/// Drive a session from line commands until `quit` or end of input.
///
/// Backend results are applied as they arrive, interleaved with input.
/// Pending requests are awaited before returning.
pub async fn run_commands<B, R, W>(
    session: &mut Session<B>,
    input: R,
    out: &mut W,
) -> Result<(), StampError>
where
    B: Backend + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        let line = if session.in_flight() > 0 {
            tokio::select! {
                line = lines.next_line() => line?,
                _ = session.next_result() => continue,
            }
        } else {
            lines.next_line().await?
        };

        let Some(line) = line else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };

        match command {
            Command::Editor(cmd) => {
                let surface = session.editor().surface();
                let message = cmd.into_message((surface.width(), surface.height()));
                session.dispatch(message);
            }
            Command::Wait => session.settle().await,
            Command::Render(path) => {
                if let Err(e) = render_to_file(session.editor(), &path) {
                    writeln!(out, "error: {}", e)?;
                } else {
                    writeln!(out, "wrote {}", path.display())?;
                }
            }
            Command::Show => write_state(session.editor(), out)?,
            Command::Stamps => {
                for name in session.editor().stamps() {
                    let marker = if Some(name.as_str()) == session.editor().selected() {
                        "*"
                    } else {
                        " "
                    };
                    writeln!(out, "{} {}", marker, name)?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => break,
        }
    }

    session.settle().await;
    let status = session.editor().status_text();
    if !status.is_empty() {
        writeln!(out, "{}", status)?;
    }
    Ok(())
}

fn render_to_file(editor: &Editor, path: &std::path::Path) -> Result<(), StampError> {
    if !editor.has_image() {
        return Err(StampError::Config("No stamp image loaded".to_string()));
    }
    let png = render::encode_png(editor.surface().pixels())?;
    std::fs::write(path, png)?;
    Ok(())
}

fn write_state<W: Write>(editor: &Editor, out: &mut W) -> Result<(), StampError> {
    let form = editor.form();
    writeln!(out, "stamp:  {}", editor.selected().unwrap_or("(none)"))?;
    writeln!(out, "point:  {}, {}", form.x, form.y)?;
    writeln!(out, "font:   {} {}px {}", form.font, form.size, form.color)?;
    writeln!(out, "text:   {}", form.preview_text)?;
    writeln!(out, "saving: {:?}", editor.save_state())?;

    let status = editor.status_text();
    if !status.is_empty() {
        writeln!(out, "status: {}", status)?;
    }
    Ok(())
}
