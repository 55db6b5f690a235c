use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use srtforge_core::audio::domain::whisper_model::WhisperModel;
use srtforge_core::audio::infrastructure::ffmpeg_audio_extractor::FfmpegAudioExtractor;
use srtforge_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use srtforge_core::pipeline::generate_subtitles_use_case::{GenerateSubtitlesUseCase, Outcome};
use srtforge_core::pipeline::progress_sink::FnProgressSink;
use srtforge_core::pipeline::video_job::VideoJob;
use srtforge_core::shared::settings::Settings;

/// Generate SRT subtitles for a video with Whisper.
#[derive(Parser)]
#[command(name = "srtforge")]
struct Cli {
    /// Input video (mp4, mkv, avi, mov, wmv). Omit with --interactive.
    input: Option<PathBuf>,

    /// Directory for generated subtitles (a subfolder per video is created).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Whisper model: tiny, base, small, medium, large.
    #[arg(short, long)]
    model: Option<String>,

    /// Language hint, e.g. "en", "tr", or "auto".
    #[arg(short, long)]
    language: Option<String>,

    /// Directory with pre-downloaded ggml model files.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Use this ggml model file instead of resolving --model.
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Prompt for jobs in a menu loop.
    #[arg(short, long)]
    interactive: bool,

    /// Store the given --output-dir, --model and --language as defaults.
    #[arg(long)]
    save_defaults: bool,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Returns whether every requested job succeeded.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = Settings::load();

    if cli.save_defaults {
        save_defaults(&cli, &mut settings)?;
        if cli.input.is_none() && !cli.interactive {
            return Ok(true);
        }
    }

    if cli.interactive {
        return run_menu(&cli, &settings);
    }

    let input = cli
        .input
        .as_ref()
        .ok_or("An input video is required unless --interactive is used")?;
    let (job, warning) = VideoJob::from_input(
        input,
        cli.output_dir.as_deref(),
        cli.model.as_deref(),
        cli.language.as_deref(),
        &settings,
    );
    if let Some(w) = warning {
        eprintln!("Warning: {w}");
    }
    run_job(&job, &cli)
}

fn save_defaults(cli: &Cli, settings: &mut Settings) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref model) = cli.model {
        settings.model = model.parse::<WhisperModel>()?;
    }
    if let Some(ref language) = cli.language {
        settings.language = language.trim().to_lowercase();
    }
    if let Some(ref dir) = cli.output_dir {
        settings.output_root = dir.clone();
    }
    let path = settings.save()?;
    log::info!("Saved defaults to {}", path.display());
    Ok(())
}

fn run_job(job: &VideoJob, cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let recognizer = build_recognizer(cli)?;
    let use_case = GenerateSubtitlesUseCase::new(Box::new(FfmpegAudioExtractor), Box::new(recognizer));

    let mut sink = FnProgressSink::new(|message: &str| eprintln!("{message}"));
    match use_case.run_job(job, &mut sink) {
        Outcome::Completed(report) => {
            log::info!(
                "{} cue(s) written, {} segment(s) dropped",
                report.cue_count,
                report.dropped
            );
            println!("{}", report.subtitle_path.display());
            Ok(true)
        }
        Outcome::Failed(_) => Ok(false),
    }
}

/// Weights are resolved (and downloaded if needed) during transcription,
/// after the pipeline has validated the job.
fn build_recognizer(cli: &Cli) -> Result<WhisperRecognizer, Box<dyn std::error::Error>> {
    match cli.model_path {
        Some(ref path) => WhisperRecognizer::with_model_path(path),
        None => Ok(WhisperRecognizer::new(cli.models_dir.as_deref())
            .with_download_progress(download_progress)),
    }
}

fn run_menu(cli: &Cli, settings: &Settings) -> Result<bool, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut all_ok = true;

    loop {
        eprintln!();
        eprintln!("=== srtforge ===");
        eprintln!("1. Generate subtitles for a video");
        eprintln!("2. Quit");

        let Some(choice) = prompt(&mut lines, "Choice (1-2): ")? else {
            break;
        };
        match choice.as_str() {
            "1" => {
                let Some(video) = prompt(&mut lines, "Video file path: ")? else {
                    break;
                };
                let output = prompt(
                    &mut lines,
                    &format!("Output directory [{}]: ", settings.output_root.display()),
                )?;
                let model_names: Vec<&str> = WhisperModel::ALL.iter().map(|m| m.as_str()).collect();
                let model = prompt(
                    &mut lines,
                    &format!("Model ({}) [{}]: ", model_names.join(", "), settings.model),
                )?;
                let language = prompt(&mut lines, &format!("Language [{}]: ", settings.language))?;

                let (job, warning) = VideoJob::from_input(
                    Path::new(&video),
                    output.as_deref().map(Path::new),
                    model.as_deref(),
                    language.as_deref(),
                    settings,
                );
                if let Some(w) = warning {
                    eprintln!("Warning: {w}");
                }
                match run_job(&job, cli) {
                    Ok(ok) => all_ok &= ok,
                    Err(e) => {
                        eprintln!("Error: {e}");
                        all_ok = false;
                    }
                }
            }
            "2" => break,
            other => eprintln!("Invalid choice '{other}', enter 1 or 2."),
        }
    }

    Ok(all_ok)
}

/// Prints `label` and reads one trimmed line. `None` on end of input.
fn prompt<B: BufRead>(
    lines: &mut io::Lines<B>,
    label: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    eprint!("{label}");
    io::stderr().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading Whisper model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading Whisper model... {downloaded} bytes");
    }
}
