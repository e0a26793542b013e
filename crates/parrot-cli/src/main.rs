//! parrot CLI — cached speech download, playback, and HTTP server.
//!
//! ```text
//! parrot serve [--host 127.0.0.1] [--port 9000]
//! parrot speak "selamat pagi" [--language id] [--folder audio]
//! parrot create "hello world" [--proxy http://127.0.0.1:3128]
//! parrot play audio/irp-<hash>.mp3 [--player mpv]
//! parrot name "hello world"
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use parrot_lib::SpeechService;
use parrot_lib::parrot_core::name::generate_name;
use parrot_lib::parrot_core::types::{
    DEFAULT_ENDPOINT, DEFAULT_FOLDER, DEFAULT_LANGUAGE, DEFAULT_PLAYER, DEFAULT_PORT, SpeechConfig,
};
use parrot_lib::player::ExternalPlayer;

/// parrot — text to speech with an on-disk cache
#[derive(Parser)]
#[command(name = "parrot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Listen host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Listen port
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Fetch speech for TEXT unless cached, then play it
    Speak {
        text: String,
        #[command(flatten)]
        speech: SpeechArgs,
    },
    /// Fetch speech for TEXT unless cached and print the file path
    Create {
        text: String,
        #[command(flatten)]
        speech: SpeechArgs,
    },
    /// Play an existing speech file
    Play {
        path: PathBuf,
        #[command(flatten)]
        speech: SpeechArgs,
    },
    /// Print the cache file name for TEXT
    Name { text: String },
}

#[derive(Args)]
struct SpeechArgs {
    /// Cache folder
    #[arg(long, env = "PARROT_FOLDER", default_value = DEFAULT_FOLDER)]
    folder: PathBuf,
    /// Language code sent to the synthesis service
    #[arg(long, env = "PARROT_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,
    /// HTTP proxy for the synthesis request (TLS verification disabled)
    #[arg(long, env = "PARROT_PROXY")]
    proxy: Option<String>,
    /// Synthesis endpoint
    #[arg(long, env = "PARROT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Player executable
    #[arg(long, env = "PARROT_PLAYER", default_value = DEFAULT_PLAYER)]
    player: String,
}

impl SpeechArgs {
    fn into_service(self) -> SpeechService {
        let mut config = SpeechConfig::new(self.folder, self.language).with_endpoint(self.endpoint);
        if let Some(proxy) = self.proxy {
            config = config.with_proxy(proxy);
        }
        SpeechService::new(config).with_player(ExternalPlayer::new(self.player))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parrot=info,parrot_lib=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            let app = parrot_lib::server::router();
            let addr = format!("{host}:{port}");

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!("server started at {addr}");

            axum::serve(listener, app).await.context("server error")?;
        }

        Command::Speak { text, speech } => {
            speech.into_service().speak(&text).await?;
        }

        Command::Create { text, speech } => {
            let path = speech.into_service().create_speech_file(&text).await?;
            println!("{}", path.display());
        }

        Command::Play { path, speech } => {
            speech.into_service().play_speech_file(&path).await?;
        }

        Command::Name { text } => println!("{}", generate_name(&text)),
    }

    Ok(())
}
