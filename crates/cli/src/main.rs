//! Video Header CLI - inspect and merge CSP policies.
//!
//! # Usage
//!
//! ```bash
//! vh-cli nonce
//! vh-cli origin https://cdn.example.com/intro.mp4
//! vh-cli parse "default-src 'self'"
//! vh-cli merge --header "default-src 'self'" --video-url https://cdn.example.com/intro.mp4
//! ```
//!
//! # Commands
//!
//! - `nonce` - Print a fresh nonce
//! - `origin` - Print the `media-src` origin of a video URL
//! - `parse` - Normalize a policy
//! - `merge` - Authorize a video script in a policy

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vh-cli")]
#[command(author, version, about = "Video header CSP tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh nonce
    Nonce,
    /// Print the media-src origin of a video URL
    Origin {
        /// Video URL
        url: String,
    },
    /// Parse and re-render a policy
    Parse {
        /// `Content-Security-Policy` header value
        header: String,
    },
    /// Merge a video origin and script nonce into a policy
    Merge {
        /// Existing `Content-Security-Policy` header value
        #[arg(long)]
        header: Option<String>,

        /// Video URL
        #[arg(short, long)]
        video_url: String,

        /// Nonce to authorize (fresh one when omitted)
        #[arg(short, long)]
        nonce: Option<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, commands::policy::PolicyError> {
    match cli.command {
        Commands::Nonce => Ok(commands::policy::nonce()),
        Commands::Origin { url } => commands::policy::origin(&url),
        Commands::Parse { header } => Ok(commands::policy::parse(&header)),
        Commands::Merge {
            header,
            video_url,
            nonce,
        } => commands::policy::merge(header.as_deref(), &video_url, nonce.as_deref()),
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}
