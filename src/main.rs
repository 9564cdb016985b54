use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlas_gateway::api::{self, AppState};
use atlas_gateway::{
    Config, EngineConfig, PatternIndex, SttConfig, Transcriber, Vocabulary, WhisperStt,
};

/// Atlas - Voice country-guessing gateway
#[derive(Parser)]
#[command(name = "atlas", version, about)]
struct Cli {
    /// Path to the vocabulary file
    #[arg(long, env = "ATLAS_VOCAB", default_value = "countries.txt")]
    vocab: PathBuf,

    /// Port to listen on
    #[arg(long, env = "ATLAS_PORT", default_value = "8000")]
    port: u16,

    /// Word capacity of each session's token buffer
    #[arg(long, default_value = "500")]
    buffer_capacity: usize,

    /// Transcription interval in milliseconds
    #[arg(long, default_value = "1000")]
    transcribe_interval_ms: u64,

    /// Matching interval in milliseconds
    #[arg(long, default_value = "500")]
    match_interval_ms: u64,

    /// OpenAI API key for Whisper transcription
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    openai_api_key: String,

    /// STT model identifier
    #[arg(long, env = "ATLAS_STT_MODEL", default_value = "whisper-1")]
    stt_model: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,atlas_gateway=info",
        1 => "info,atlas_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config {
        vocab_path: cli.vocab,
        port: cli.port,
        engine: EngineConfig {
            buffer_capacity: cli.buffer_capacity,
            transcribe_interval: Duration::from_millis(cli.transcribe_interval_ms),
            match_interval: Duration::from_millis(cli.match_interval_ms),
        },
        stt: SttConfig {
            api_key: cli.openai_api_key,
            model: cli.stt_model,
        },
    };

    // Fatal startup path: vocabulary, index, and transcriber must all be
    // ready before any connection is accepted.
    let vocab = Vocabulary::load(&config.vocab_path)?;
    tracing::info!(
        countries = vocab.canonical().len(),
        alternates = vocab.aliases().len(),
        "loaded vocabulary"
    );

    let index = Arc::new(PatternIndex::compile(&vocab)?);
    tracing::info!(patterns = index.len(), "compiled pattern index");

    let transcriber: Arc<dyn Transcriber> =
        Arc::new(WhisperStt::new(config.stt.api_key.clone(), config.stt.model.clone())?);

    let state = Arc::new(AppState {
        index,
        transcriber,
        engine: config.engine.clone(),
    });

    tracing::info!(port = config.port, "atlas gateway ready");
    api::serve(state, config.port).await?;

    Ok(())
}
