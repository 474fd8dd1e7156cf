use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tortoise_frontend::audio::{load_audio, write_wav};
use tortoise_frontend::server::HttpSpeechModel;
use tortoise_frontend::{
    BasicRequest, CONDITIONING_SAMPLE_RATE, DirectoryVoiceStore, Emotion, ExpressiveRequest,
    FrontendConfig, LongformRequest, Preset, SpeechSession, SplitMode, VoiceOption, VoiceStore,
};

#[derive(Parser)]
#[command(name = "tortoise")]
#[command(about = "Tortoise TTS front-ends - speak, expressive and long-form synthesis", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model server URL, overrides the config file
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Extra voice directory, searched after the configured ones
    #[arg(long, global = true)]
    voice_dir: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Generation {
    /// Quality preset: ultra_fast, fast, standard, high_quality
    #[arg(short, long, default_value = "fast")]
    preset: Preset,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize text with a single voice
    Speak {
        /// Text to synthesize
        text: String,

        #[arg(short, long, default_value = "angie")]
        voice: VoiceOption,

        #[command(flatten)]
        generation: Generation,

        /// Output WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Synthesize several candidates with emotion and voice mixing
    Expressive {
        /// Text to synthesize
        text: String,

        /// Emotion: None/Custom, Happy, Sad, Angry, Disgusted, Arrogant
        #[arg(short, long, default_value = "None/Custom")]
        emotion: Emotion,

        /// Custom prompt, used when emotion is None/Custom
        #[arg(long, default_value = "")]
        prompt: String,

        #[arg(short, long, default_value = "angie")]
        voice: VoiceOption,

        /// Recording used when the voice is custom_voice
        #[arg(long)]
        mic_audio: Option<PathBuf>,

        #[arg(long, default_value = "disabled")]
        voice_b: VoiceOption,

        #[arg(long, default_value = "disabled")]
        voice_c: VoiceOption,

        #[command(flatten)]
        generation: Generation,

        /// Directory for the candidate WAV files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Narrate a long text passage by passage
    Longform {
        /// Text to narrate; takes precedence over --script unless blank
        #[arg(short, long)]
        text: Option<String>,

        /// Text file narrated when --text is missing or blank
        #[arg(long)]
        script: Option<PathBuf>,

        /// Name of the narration (output file and passage folder)
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "angie")]
        voice: VoiceOption,

        #[arg(long, default_value = "disabled")]
        voice_b: VoiceOption,

        #[arg(long, default_value = "disabled")]
        voice_c: VoiceOption,

        #[command(flatten)]
        generation: Generation,

        /// Passage numbers to regenerate, e.g. "2 5"; omit to regenerate all
        #[arg(short, long, default_value = "")]
        regenerate: String,

        /// Split passages on newlines ("yes") or by sentence length ("no")
        #[arg(long, default_value = "no")]
        split_by_newline: SplitMode,
    },
    /// List voice names and which ones are present on disk
    Voices,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Voices => list_voices(&config),
        Commands::Speak {
            text,
            voice,
            generation,
            output,
        } => {
            let session = build_session(config)?;
            let output = output.unwrap_or_else(|| session.config().output_dir.join("speak.wav"));
            let result = session
                .basic(BasicRequest {
                    text,
                    voice,
                    preset: generation.preset,
                    seed: generation.seed,
                })
                .await?;

            write_wav(&output, &result.audio)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{}", output.display());
            Ok(())
        }
        Commands::Expressive {
            text,
            emotion,
            prompt,
            voice,
            mic_audio,
            voice_b,
            voice_c,
            generation,
            output_dir,
        } => {
            if mic_audio.is_some() && voice != VoiceOption::CustomVoice {
                anyhow::bail!("--mic-audio is only used with --voice custom_voice");
            }
            let custom_audio = mic_audio
                .as_deref()
                .map(|path| {
                    load_audio(path, CONDITIONING_SAMPLE_RATE)
                        .with_context(|| format!("Failed to read {}", path.display()))
                })
                .transpose()?;

            let session = build_session(config)?;
            let output_dir =
                output_dir.unwrap_or_else(|| session.config().output_dir.join("expressive"));
            let result = session
                .expressive(ExpressiveRequest {
                    emotion,
                    prompt,
                    custom_audio,
                    voice_b,
                    voice_c,
                    preset: generation.preset,
                    seed: generation.seed,
                    ..ExpressiveRequest::new(text, voice)
                })
                .await?;

            if let Some(sample) = &result.voice_sample {
                write_output(&output_dir.join("voice_sample.wav"), sample)?;
            }
            for (idx, candidate) in result.candidates.iter().enumerate() {
                write_output(&output_dir.join(format!("candidate_{}.wav", idx + 1)), candidate)?;
            }
            match result.seed {
                Some(seed) => println!("Seed: {}", seed),
                None => println!("Seed: None"),
            }
            Ok(())
        }
        Commands::Longform {
            text,
            script,
            name,
            voice,
            voice_b,
            voice_c,
            generation,
            regenerate,
            split_by_newline,
        } => {
            if text.is_none() && script.is_none() {
                anyhow::bail!("Either --text or --script must be specified");
            }
            let session = build_session(config)?;
            session
                .script_log()
                .write_banner()
                .context("Failed to write scripts log")?;

            let result = session
                .longform(LongformRequest {
                    text,
                    script,
                    name,
                    voice,
                    voice_b,
                    voice_c,
                    preset: generation.preset,
                    seed: generation.seed,
                    regenerate,
                    split: split_by_newline,
                })
                .await?;

            println!("{}", result.listing());
            println!("\n{}", result.output_path.display());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<FrontendConfig> {
    let mut config = FrontendConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(url) = &cli.server_url {
        config.server.base_url = url.clone();
    }
    config.voice_dirs.extend(cli.voice_dir.iter().cloned());
    Ok(config)
}

fn build_session(config: FrontendConfig) -> Result<SpeechSession> {
    let model = HttpSpeechModel::new(config.server.clone())
        .context("Failed to create model client")?;
    log::info!("Using model server at {}", config.server.base_url);

    let store = DirectoryVoiceStore::new(config.voice_dirs.clone());
    Ok(SpeechSession::new(Arc::new(model), Arc::new(store), config))
}

fn write_output(path: &Path, audio: &tortoise_frontend::AudioData) -> Result<()> {
    write_wav(path, audio).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn list_voices(config: &FrontendConfig) -> Result<()> {
    let store = DirectoryVoiceStore::new(config.voice_dirs.clone());
    let available = store.available_voices();

    println!("Voice directories:");
    for dir in store.roots() {
        println!("  {}", dir.display());
    }
    println!();
    for voice in VoiceOption::all() {
        let marker = if voice.is_sentinel() {
            "special"
        } else if available.contains(voice) {
            "available"
        } else {
            "missing"
        };
        println!("  {:<20} {}", voice.identifier(), marker);
    }
    Ok(())
}
