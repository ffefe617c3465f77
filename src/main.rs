//! auto-card-embed - Command Line Entry Point
//!
//! Runs the conversions against an in-memory document:
//! - `classify`: print a URL's category
//! - `card` / `link`: fetch a page and print its card or title link
//! - `embed`: render an `autoembed` block to HTML
//! - `enhance`: convert every URL in a markdown file to a card
//! - `paste`: convert the clipboard contents to a card
//! - `config`: show the settings file

use auto_card_embed::config::{get_config_file_path, load_config};
use auto_card_embed::editor::{shared, TextDocument};
use auto_card_embed::embed::ERROR_CLASS;
use auto_card_embed::fetch::HttpTransport;
use auto_card_embed::{classify, AutoCardEmbed, ConversionOutcome, Error, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Application name constant.
const APP_NAME: &str = "auto-card-embed";

/// Turn bare URLs into metadata cards or rich embeds.
#[derive(Parser)]
#[command(name = "auto-card-embed", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the content category of a URL.
    Classify { url: String },
    /// Fetch a page and print its `cardlink` block.
    Card { url: String },
    /// Fetch a page and print `[title](url)`.
    Link { url: String },
    /// Render an embed for a video or social-post URL as HTML.
    Embed {
        url: String,
        /// Render social-post frames in the dark theme
        #[arg(long)]
        dark: bool,
    },
    /// Convert every URL in a markdown file to a card.
    Enhance {
        file: PathBuf,
        /// Write the result back instead of printing it
        #[arg(long)]
        in_place: bool,
    },
    /// Convert the clipboard contents to a card.
    Paste,
    /// Show the current settings.
    Config {
        /// Print the settings file location only
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let settings = load_config();

    match &command {
        Commands::Classify { url } => {
            println!("{}", classify(url));
            return Ok(());
        }
        Commands::Config { path } => {
            if *path {
                println!("{}", get_config_file_path()?.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            return Ok(());
        }
        _ => {}
    }

    let transport = HttpTransport::new(settings.user_agent.as_deref())?;
    let service = AutoCardEmbed::new(settings, Arc::new(transport));
    info!("Starting {}", APP_NAME);

    match command {
        Commands::Card { url } => {
            let doc = shared(TextDocument::new(""));
            report(service.convert_url_to_card(&doc, &url).await);
            print!("{}", doc.lock().await.content());
        }
        Commands::Link { url } => {
            let doc = shared(TextDocument::new(""));
            report(
                service
                    .converter()
                    .convert_url_to_title_link(&doc, &url)
                    .await,
            );
            println!("{}", doc.lock().await.content());
        }
        Commands::Embed { url, dark } => {
            let rendered = service.render_embed(&format!("url: {}", url), dark);
            if rendered.element.has_class(ERROR_CLASS) {
                let message = rendered
                    .element
                    .children()
                    .first()
                    .and_then(|span| span.text())
                    .unwrap_or("autoembed error");
                return Err(Error::Application(message.to_string()));
            }
            println!("{}", rendered.element.to_html());
            service.release_embed(&rendered);
        }
        Commands::Enhance { file, in_place } => {
            let content = std::fs::read_to_string(&file)?;
            let len = content.len();
            let doc = shared(TextDocument::with_selection(content, 0, len));

            let outcomes = service.enhance_selected_url(&doc).await;
            let converted = outcomes
                .iter()
                .filter(|o| **o == ConversionOutcome::Converted)
                .count();
            info!("Converted {} of {} URL(s)", converted, outcomes.len());

            let doc = doc.lock().await;
            if in_place {
                std::fs::write(&file, doc.content())?;
            } else {
                print!("{}", doc.content());
            }
        }
        Commands::Paste => {
            let doc = shared(TextDocument::new(""));
            match service.manual_paste_as_card(&doc).await? {
                Some(outcome) => report(outcome),
                None => info!("Clipboard is empty"),
            }
            print!("{}", doc.lock().await.content());
        }
        Commands::Classify { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn report(outcome: ConversionOutcome) {
    match outcome {
        ConversionOutcome::Converted | ConversionOutcome::Inserted => {}
        other => info!("Conversion finished as {:?}", other),
    }
}
