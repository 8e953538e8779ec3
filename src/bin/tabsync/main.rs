//! tabsync - play a tab transcription with a live cursor
//!
//! Run with: cargo run -- transcription.json [--audio recording.wav]

mod app;
mod ui;

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};

use tabsync::engine::PlaybackController;
use tabsync::output::{CpalSink, OriginalRecording};
use tabsync::transcription;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let (transcription_path, audio_path) = parse_args()?;

    let raw = std::fs::read_to_string(&transcription_path)
        .wrap_err_with(|| format!("failed to read {}", transcription_path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).wrap_err("transcription file is not valid JSON")?;
    let result = transcription::sanitize(&value).wrap_err("transcription failed validation")?;

    let mut sink = CpalSink::open().wrap_err("failed to open audio output")?;
    if let Some(path) = audio_path {
        let recording = OriginalRecording::from_wav_path(&path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?;
        sink.load_original(&recording);
    }

    let controller = PlaybackController::new(sink);
    let mut app = app::App::new(controller, result);

    let mut terminal = ratatui::init();
    let outcome = app.run(&mut terminal);
    ratatui::restore();
    outcome
}

fn parse_args() -> EyreResult<(PathBuf, Option<PathBuf>)> {
    let mut args = std::env::args().skip(1);
    let transcription = args
        .next()
        .ok_or_else(|| eyre!("usage: tabsync <transcription.json> [--audio recording.wav]"))?;

    let mut audio = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--audio" => {
                let path = args.next().ok_or_else(|| eyre!("--audio requires a path"))?;
                audio = Some(PathBuf::from(path));
            }
            other => return Err(eyre!("unexpected argument: {other}")),
        }
    }

    Ok((PathBuf::from(transcription), audio))
}
