use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use serde_json::json;
use tokio::io::BufReader;
use tokio::sync::mpsc::unbounded_channel;

use crate::ui::prelude::*;

use super::cli::{
    CaptionCommands, CheckArgs, PlayArgs, RenderRequestArgs, ResolveArgs, SrtArgs, TranscriptArgs,
};
use super::clock::{ManualClock, PlaybackClock, WallClock};
use super::config::CaptionConfig;
use super::console::{CONSOLE_HELP, ConsoleContext, report_event, run_console};
use super::engine::{CaptionEngine, GenerationOutcome};
use super::playback::{shared, spawn_ticker};
use super::segment::format_clock;
use super::source::load_generation;
use super::srt::write_srt;
use super::stats::caption_stats;
use super::sync::SyncEvent;
use super::transcript::{TranscriptHeader, format_transcript};

pub async fn handle_caption_command(command: CaptionCommands, config: &CaptionConfig) -> Result<()> {
    match command {
        CaptionCommands::Check(args) => handle_check(args),
        CaptionCommands::Transcript(args) => handle_transcript(args, config),
        CaptionCommands::Srt(args) => handle_srt(args),
        CaptionCommands::Resolve(args) => handle_resolve(args),
        CaptionCommands::RenderRequest(args) => handle_render_request(args, config),
        CaptionCommands::Play(args) => handle_play(args, config).await,
    }
}

/// Loads a caption file into a fresh engine. A generation error is fatal;
/// "no speech" leaves an empty caption set and is reported as a warning.
fn load_engine<C: PlaybackClock>(path: &Path, clock: C) -> Result<CaptionEngine<C>> {
    let response = load_generation(path)?;
    let mut engine = CaptionEngine::new(clock);
    let outcome = engine
        .apply_generation(response)
        .with_context(|| format!("Failed to load captions from {}", path.display()))?;
    report_generation(path, &outcome);
    Ok(engine)
}

fn report_generation(path: &Path, outcome: &GenerationOutcome) {
    if let Some(notice) = &outcome.notice {
        emit(
            Level::Warn,
            "captions.generation.no_speech",
            notice,
            Some(json!({ "path": path.display().to_string() })),
        );
        return;
    }

    let language = outcome
        .detected_language
        .as_deref()
        .map(|lang| format!(" (language: {lang})"))
        .unwrap_or_default();
    emit(
        Level::Debug,
        "captions.generation.loaded",
        &format!(
            "Loaded {} caption segment(s) from {}{language}",
            outcome.installed,
            path.display()
        ),
        Some(json!({
            "path": path.display().to_string(),
            "segments": outcome.installed,
            "detected_language": outcome.detected_language,
        })),
    );
}

fn write_output(path: &Path, content: &str, code: &str, what: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write {what} to {}", path.display()))?;
    emit(
        Level::Success,
        code,
        &format!("Wrote {what} to {}", path.display()),
        Some(json!({ "path": path.display().to_string() })),
    );
    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let engine = load_engine(&args.captions, ManualClock::default())?;
    let stats = caption_stats(engine.segments());

    emit(
        Level::Success,
        "captions.check.valid",
        &format!("{} contains valid captions", args.captions.display()),
        None,
    );

    let span = match (stats.first_start, stats.last_end) {
        (Some(start), Some(end)) => format!("{} → {}", format_clock(start), format_clock(end)),
        _ => "empty".to_string(),
    };
    emit(
        Level::Info,
        "captions.check.counts",
        &format!(
            "Segments: {}, Span: {span}, Spoken: {:.1}s",
            stats.segment_count, stats.spoken_seconds
        ),
        serde_json::to_value(&stats).ok(),
    );

    if !stats.overlapping_pairs.is_empty() {
        let pairs = stats
            .overlapping_pairs
            .iter()
            .map(|(a, b)| format!("#{a}/#{b}"))
            .collect::<Vec<_>>()
            .join(", ");
        emit(
            Level::Warn,
            "captions.check.overlaps",
            &format!("Overlapping segments (the earlier one wins): {pairs}"),
            None,
        );
    }
    if !stats.inverted.is_empty() {
        emit(
            Level::Warn,
            "captions.check.inverted",
            &format!(
                "{} segment(s) end before they start and will never display: {:?}",
                stats.inverted.len(),
                stats.inverted
            ),
            None,
        );
    }
    if !stats.empty_text.is_empty() {
        emit(
            Level::Warn,
            "captions.check.empty_text",
            &format!("{} segment(s) have no text", stats.empty_text.len()),
            None,
        );
    }

    Ok(())
}

fn handle_transcript(args: TranscriptArgs, config: &CaptionConfig) -> Result<()> {
    let engine = load_engine(&args.captions, ManualClock::default())?;
    let style = config.style();

    let mut header = TranscriptHeader {
        generated_at: (!args.no_timestamp).then(Local::now),
        ..TranscriptHeader::default()
    };
    if let Some(project) = args.project.or_else(|| config.project_name.clone()) {
        header.project = project;
    }

    let Some(document) = format_transcript(engine.segments(), &style, &header) else {
        emit(
            Level::Warn,
            "captions.transcript.empty",
            "No captions to export",
            None,
        );
        return Ok(());
    };

    match args.out_file {
        Some(path) => write_output(&path, &document, "captions.transcript.written", "transcript"),
        None => {
            emit_document("captions.transcript", &document);
            Ok(())
        }
    }
}

fn handle_srt(args: SrtArgs) -> Result<()> {
    let engine = load_engine(&args.captions, ManualClock::default())?;
    let document = write_srt(engine.segments());

    match args.out_file {
        Some(path) => write_output(&path, &document, "captions.srt.written", "SRT"),
        None => {
            emit_document("captions.srt", &document);
            Ok(())
        }
    }
}

fn handle_resolve(args: ResolveArgs) -> Result<()> {
    let mut engine = load_engine(&args.captions, ManualClock::default())?;

    for (step, &time) in args.times.iter().enumerate() {
        let event = if args.seek {
            engine.seek(time)
        } else {
            engine.clock_mut().set(time);
            if step == 0 {
                engine.play()
            } else {
                engine.tick()
            }
        };
        report_sample(time, event.as_ref());
    }

    emit(
        Level::Debug,
        "captions.resolve.done",
        &format!("{} sample(s) resolved", args.times.len()),
        None,
    );
    Ok(())
}

fn report_sample(time: f64, event: Option<&SyncEvent>) {
    match event {
        Some(SyncEvent::Activated { index, text }) => emit(
            Level::Info,
            "captions.resolve.activated",
            &format!("{time:>8.3}s  ▶ #{index} {text}"),
            Some(json!({ "time": time, "index": index, "text": text })),
        ),
        Some(SyncEvent::Deactivated) => emit(
            Level::Info,
            "captions.resolve.deactivated",
            &format!("{time:>8.3}s  ■ no caption"),
            Some(json!({ "time": time, "index": null })),
        ),
        None => emit(
            Level::Debug,
            "captions.resolve.unchanged",
            &format!("{time:>8.3}s  (unchanged)"),
            Some(json!({ "time": time })),
        ),
    }
}

fn handle_render_request(args: RenderRequestArgs, config: &CaptionConfig) -> Result<()> {
    let engine = load_engine(&args.captions, ManualClock::default())?;
    let style = config.style();
    let request = engine.render_request(args.media.display().to_string(), &style);

    match get_output_format() {
        OutputFormat::Json => {
            let value = serde_json::to_value(&request).context("Failed to encode render request")?;
            emit(
                Level::Info,
                "captions.render_request",
                &format!("Render request with {} segment(s)", request.segments.len()),
                Some(value),
            );
        }
        OutputFormat::Text => {
            let body =
                serde_json::to_string_pretty(&request).context("Failed to encode render request")?;
            emit_document("captions.render_request", &format!("{body}\n"));
        }
    }
    Ok(())
}

async fn handle_play(args: PlayArgs, config: &CaptionConfig) -> Result<()> {
    let rate = args.rate.unwrap_or(config.playback_rate);
    if !rate.is_finite() || rate <= 0.0 {
        return Err(anyhow!("Playback rate must be a positive number, got {rate}"));
    }

    let engine = shared(load_engine(&args.captions, WallClock::new(rate))?);

    // ticker and console share one channel, so the printer sees events in engine order
    let (tx, mut rx) = unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            report_event(&event);
        }
    });
    let ticker = spawn_ticker(engine.clone(), config.tick_interval(), tx.clone());

    let context = ConsoleContext {
        style: config.style(),
        project: config
            .project_name
            .clone()
            .unwrap_or_else(|| TranscriptHeader::default().project),
        events: tx,
    };

    emit(Level::Debug, "captions.console.help", CONSOLE_HELP, None);
    if !args.paused {
        let mut guard = engine.lock().await;
        if let Some(event) = guard.play() {
            let _ = context.events.send(event);
        }
    }

    // run_console consumes the context and with it the console's sender
    let console = run_console(
        engine.clone(),
        BufReader::new(tokio::io::stdin()),
        context,
    )
    .await;

    // aborting the ticker drops the last sender, so the printer drains and exits
    ticker.abort();
    let _ = ticker.await;
    printer.await.context("event printer task failed")?;
    console?;

    let guard = engine.lock().await;
    emit(
        Level::Debug,
        "captions.playback.stopped",
        &format!(
            "Stopped at {} with {} segment(s)",
            format_clock(guard.position()),
            guard.len()
        ),
        None,
    );
    Ok(())
}
