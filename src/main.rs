//! # Stampcal CLI
//!
//! Command-line interface for stamp text calibration.
//!
//! ## Usage
//!
//! ```bash
//! # Run the stamp server
//! stampcal serve --port 5000 --stamp-dir stamp
//!
//! # Calibrate against a running server, reading commands from stdin
//! stampcal calibrate --url http://127.0.0.1:5000 --text A-2024-117
//!
//! # Render a finished stamp locally
//! stampcal generate approved.png A-2024-117 --width 400 --out approved.png
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stampcal::{
    StampError,
    backend::HttpBackend,
    editor::{Editor, Field, Message},
    generate,
    placement::file,
    render::{self, font::FontBook},
    server::{self, ServerConfig},
    session::{self, Session},
};

/// Stampcal - Stamp text placement utility
#[derive(Parser, Debug)]
#[command(name = "stampcal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the stamp server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Directory holding stamp images
        #[arg(long, default_value = "stamp")]
        stamp_dir: PathBuf,

        /// Placement configuration file
        #[arg(long, default_value = "stamp_config.json")]
        config_file: PathBuf,

        /// Directory with TrueType fonts (bitmap fallback if omitted)
        #[arg(long)]
        font_dir: Option<PathBuf>,
    },

    /// Calibrate stamps interactively against a server
    Calibrate {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        url: String,

        /// Directory with TrueType fonts (bitmap fallback if omitted)
        #[arg(long)]
        font_dir: Option<PathBuf>,

        /// Initial preview text
        #[arg(long)]
        text: Option<String>,
    },

    /// Render a configured stamp with text to a PNG file
    Generate {
        /// Stamp file name
        stamp: String,

        /// Text to draw
        text: String,

        /// Output width in pixels; height follows the aspect ratio
        #[arg(long)]
        width: Option<u32>,

        /// Output file
        #[arg(long, value_name = "FILE", default_value = "generated.png")]
        out: PathBuf,

        /// Directory holding stamp images
        #[arg(long, default_value = "stamp")]
        stamp_dir: PathBuf,

        /// Placement configuration file
        #[arg(long, default_value = "stamp_config.json")]
        config_file: PathBuf,

        /// Directory with TrueType fonts (bitmap fallback if omitted)
        #[arg(long)]
        font_dir: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StampError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            stamp_dir,
            config_file,
            font_dir,
        } => {
            let config = ServerConfig {
                listen_addr: format!("{}:{}", host, port),
                stamp_dir,
                config_file,
                font_dir,
            };

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(config))
        }

        Commands::Calibrate {
            url,
            font_dir,
            text,
        } => {
            let backend = HttpBackend::new(&url)?;
            let editor = Editor::new(FontBook::new(font_dir));

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(async move {
                let mut session = Session::new(editor, backend);
                if let Some(text) = text {
                    session.dispatch(Message::EditField(Field::PreviewText, text));
                }
                session.initialize().await;

                let editor = session.editor();
                match editor.selected() {
                    Some(name) => {
                        println!("Loaded {} stamps, editing {}", editor.stamps().len(), name)
                    }
                    None => println!("No stamps available"),
                }
                println!("Type 'help' for commands.");

                let input = tokio::io::BufReader::new(tokio::io::stdin());
                let mut out = std::io::stdout();
                session::run_commands(&mut session, input, &mut out).await
            })
        }

        Commands::Generate {
            stamp,
            text,
            width,
            out,
            stamp_dir,
            config_file,
            font_dir,
        } => {
            let store = file::load_store(&config_file)?;
            let mut fonts = FontBook::new(font_dir);
            let image =
                generate::generate_from_dir(&stamp_dir, &store, &stamp, &text, width, &mut fonts)?;

            let png = render::encode_png(&image)?;
            std::fs::write(&out, png)?;
            println!(
                "Saved {}x{} to {}",
                image.width(),
                image.height(),
                out.display()
            );
            Ok(())
        }
    }
}
