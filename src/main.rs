//! Memovox - voice memo record/playback core
//!
//! Run `memovox demo` for the scripted record-then-replay sequence on the
//! loopback transport, `memovox info <file>` to inspect a recording, or
//! `memovox config` to show the active configuration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use memovox::audio::loopback::{MemorySink, ScriptedSource};
use memovox::config::DEFAULT_CONFIG;
use memovox::indicator::LogIndicator;
use memovox::wav::WavStreamReader;
use memovox::{Config, RecPlayManager};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memovox")]
#[command(author, version, about = "Voice memo record/playback core")]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a synthetic capture, then replay it (the appliance's boot
    /// script, on the loopback transport)
    Demo {
        /// Seconds of audio to record
        #[arg(long, default_value_t = 4)]
        seconds: u32,

        /// Output file (defaults to <recordings dir>/demo.wav)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print the header of a WAV file
    Info {
        /// Path to the recording
        file: PathBuf,
    },

    /// Show current configuration
    Config {
        /// Print the default config template instead
        #[arg(long)]
        default: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("memovox={}", log_level))),
        )
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Demo {
        seconds: 4,
        out: None,
    }) {
        Commands::Demo { seconds, out } => run_demo(&config, seconds, out),
        Commands::Info { file } => print_info(&file),
        Commands::Config { default } => {
            if default {
                print!("{}", DEFAULT_CONFIG);
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(())
        }
    }
}

/// Poll `cond` until it holds or `timeout` elapses.
fn wait_until(cond: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

/// The scripted sequence the appliance runs at boot: record for a fixed
/// window, stop, replay the file, stop. The capture is a biased square
/// wave so the run exercises calibration end to end.
fn run_demo(config: &Config, seconds: u32, out: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::ensure!(seconds > 0, "--seconds must be at least 1");
    let dir = config.recordings_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create recordings dir {}", dir.display()))?;
    let path = out.unwrap_or_else(|| dir.join("demo.wav"));

    // bound the session by the sample cap so it ends on its own
    let mut config = config.clone();
    config.recording.max_samples = config.audio.sample_rate as u64 * seconds as u64;

    let offset = 1 << 20;
    let swing = 1 << 18;
    let source =
        ScriptedSource::new(move |i| offset + if (i / 100) % 2 == 0 { swing } else { -swing });
    let sink = MemorySink::new();

    let mut manager = RecPlayManager::spawn(
        &config,
        Box::new(source),
        Box::new(sink.clone()),
        Box::new(LogIndicator),
    );

    manager.start_rec(&path);
    anyhow::ensure!(
        wait_until(
            || path.exists() && !manager.recording_active(),
            Duration::from_secs(60)
        ),
        "recording did not finish"
    );

    manager.start_play(&path);
    anyhow::ensure!(
        wait_until(|| !manager.playback_active() && !sink.is_empty(), Duration::from_secs(60)),
        "playback did not finish"
    );
    manager.shutdown();

    let reader = WavStreamReader::open(&path)?;
    let header = *reader.header();
    println!(
        "recorded {} ({} samples, {:.2}s), replayed {} frames",
        path.display(),
        header.sample_count(),
        header.sample_count() as f64 / header.sample_rate as f64,
        sink.len()
    );
    Ok(())
}

fn print_info(file: &PathBuf) -> anyhow::Result<()> {
    let reader = WavStreamReader::open(file)
        .with_context(|| format!("cannot open {}", file.display()))?;
    let header = reader.header();
    println!("file:            {}", file.display());
    println!("wav_size:        {}", header.wav_size);
    println!("format:          {} (1 = PCM)", header.audio_format);
    println!("channels:        {}", header.num_channels);
    println!("sample_rate:     {} Hz", header.sample_rate);
    println!("byte_rate:       {}", header.byte_rate);
    println!("block_align:     {}", header.block_align);
    println!("bits_per_sample: {}", header.bits_per_sample);
    println!("data_bytes:      {}", header.data_bytes);
    println!("samples:         {}", header.sample_count());
    println!(
        "duration:        {:.3}s",
        header.sample_count() as f64 / header.sample_rate.max(1) as f64
    );
    Ok(())
}
