use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

use crate::ui::prelude::*;

use super::clock::PlaybackClock;
use super::edit::EditMode;
use super::engine::CaptionEngine;
use super::error::CaptionError;
use super::playback::SharedEngine;
use super::segment::format_clock;
use super::style::CaptionStyle;
use super::sync::SyncEvent;
use super::transcript::{TranscriptHeader, format_transcript};

/// One line typed into the `captl play` console.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Play,
    /// Jump to a segment's start and play from there
    PlaySegment(usize),
    Pause,
    Seek(f64),
    /// Jump to a segment's start
    Goto(usize),
    Edit(usize),
    Type { index: usize, text: String },
    Save(usize),
    Cancel(usize),
    Delete(usize),
    Revert,
    List,
    Transcript,
    Status,
    Quit,
}

pub const CONSOLE_HELP: &str = "commands: play [i], pause, seek <seconds>, goto <i>, edit <i>, type <i> <text>, \
save <i>, cancel <i>, delete <i>, revert, list, transcript, status, quit";

impl FromStr for ConsoleCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "play" if rest.is_empty() => ConsoleCommand::Play,
            "play" => ConsoleCommand::PlaySegment(parse_index(rest)?),
            "pause" => ConsoleCommand::Pause,
            "seek" => ConsoleCommand::Seek(parse_seconds(rest)?),
            "goto" => ConsoleCommand::Goto(parse_index(rest)?),
            "edit" => ConsoleCommand::Edit(parse_index(rest)?),
            "type" => {
                let (index, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                ConsoleCommand::Type {
                    index: parse_index(index)?,
                    text: text.trim_start().to_string(),
                }
            }
            "save" => ConsoleCommand::Save(parse_index(rest)?),
            "cancel" => ConsoleCommand::Cancel(parse_index(rest)?),
            "delete" | "rm" => ConsoleCommand::Delete(parse_index(rest)?),
            "revert" => ConsoleCommand::Revert,
            "list" | "ls" => ConsoleCommand::List,
            "transcript" => ConsoleCommand::Transcript,
            "status" => ConsoleCommand::Status,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command '{other}'"),
        };
        Ok(command)
    }
}

fn parse_index(arg: &str) -> Result<usize> {
    let arg = arg.trim();
    if arg.is_empty() {
        bail!("missing segment index");
    }
    arg.parse::<usize>()
        .with_context(|| format!("invalid segment index '{arg}'"))
}

fn parse_seconds(arg: &str) -> Result<f64> {
    let arg = arg.trim();
    let seconds = arg
        .parse::<f64>()
        .with_context(|| format!("invalid time '{arg}'"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(anyhow!("time must be a non-negative number of seconds"));
    }
    Ok(seconds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFlow {
    Continue,
    Quit,
}

/// What the console needs besides the engine. Sync events go to `events`, the
/// same channel the ticker feeds, so one consumer sees them in engine order.
#[derive(Debug, Clone)]
pub struct ConsoleContext {
    pub style: CaptionStyle,
    pub project: String,
    pub events: UnboundedSender<SyncEvent>,
}

pub fn report_event(event: &SyncEvent) {
    let data = serde_json::to_value(event).ok();
    match event {
        SyncEvent::Activated { index, text } => emit(
            Level::Info,
            "captions.sync.activated",
            &format!("▶ #{index} {text}"),
            data,
        ),
        SyncEvent::Deactivated => emit(
            Level::Info,
            "captions.sync.deactivated",
            "■ no caption",
            data,
        ),
    }
}

impl ConsoleContext {
    // Called with the engine lock held.
    fn forward(&self, event: Option<SyncEvent>) {
        if let Some(event) = event {
            // a closed channel means nobody is displaying events anymore
            let _ = self.events.send(event);
        }
    }
}

/// Applies one console command. Engine errors are returned to the caller;
/// they never leave the engine half-modified.
pub fn execute<C: PlaybackClock>(
    engine: &mut CaptionEngine<C>,
    command: ConsoleCommand,
    context: &ConsoleContext,
) -> Result<ConsoleFlow> {
    match command {
        ConsoleCommand::Play => {
            context.forward(engine.play());
            emit(
                Level::Debug,
                "captions.playback.play",
                &format!("playing from {:.2}s", engine.position()),
                None,
            );
        }
        ConsoleCommand::PlaySegment(index) => {
            context.forward(engine.play_segment(index)?);
            emit(
                Level::Debug,
                "captions.playback.play",
                &format!("playing #{index} from {:.2}s", engine.position()),
                None,
            );
        }
        ConsoleCommand::Pause => {
            engine.pause();
            emit(
                Level::Debug,
                "captions.playback.pause",
                &format!("paused at {:.2}s", engine.position()),
                None,
            );
        }
        ConsoleCommand::Seek(seconds) => context.forward(engine.seek(seconds)),
        ConsoleCommand::Goto(index) => context.forward(engine.seek_to_segment(index)?),
        ConsoleCommand::Edit(index) => {
            let working = engine.begin_edit(index)?.to_string();
            emit(
                Level::Info,
                "captions.edit.opened",
                &format!("editing #{index}: {working}"),
                Some(json!({ "index": index, "working_text": working })),
            );
        }
        ConsoleCommand::Type { index, text } => {
            engine.set_working_text(index, text.clone())?;
            emit(
                Level::Debug,
                "captions.edit.working",
                &format!("#{index} working text: {text}"),
                Some(json!({ "index": index, "working_text": text })),
            );
        }
        ConsoleCommand::Save(index) => {
            let event = engine.save_edit(index)?;
            let text = engine.get(index)?.text.clone();
            emit(
                Level::Success,
                "captions.edit.saved",
                &format!("saved #{index}: {text}"),
                Some(json!({ "index": index, "text": text })),
            );
            context.forward(event);
        }
        ConsoleCommand::Cancel(index) => {
            engine.cancel_edit(index)?;
            emit(
                Level::Info,
                "captions.edit.cancelled",
                &format!("discarded edits to #{index}"),
                Some(json!({ "index": index })),
            );
        }
        ConsoleCommand::Delete(index) => {
            let event = engine.delete(index)?;
            emit(
                Level::Success,
                "captions.segment.deleted",
                &format!("deleted #{index}, {} remaining", engine.len()),
                Some(json!({ "index": index, "remaining": engine.len() })),
            );
            context.forward(event);
        }
        ConsoleCommand::Revert => {
            let event = engine.revert_to_baseline()?;
            emit(
                Level::Success,
                "captions.set.reverted",
                &format!("reverted to {} original segment(s)", engine.len()),
                Some(json!({ "segments": engine.len() })),
            );
            context.forward(event);
        }
        ConsoleCommand::List => list_segments(engine),
        ConsoleCommand::Transcript => {
            let header = TranscriptHeader {
                project: context.project.clone(),
                generated_at: Some(Local::now()),
            };
            match format_transcript(engine.segments(), &context.style, &header) {
                Some(document) => emit_document("captions.transcript", &document),
                None => emit(
                    Level::Warn,
                    "captions.transcript.empty",
                    "No captions to export",
                    None,
                ),
            }
        }
        ConsoleCommand::Status => {
            let active = engine.active_index();
            emit(
                Level::Info,
                "captions.playback.status",
                &format!(
                    "{} at {} ({:.2}s), {} segment(s), active: {}",
                    if engine.is_playing() { "playing" } else { "paused" },
                    format_clock(engine.position()),
                    engine.position(),
                    engine.len(),
                    active.map_or_else(|| "none".to_string(), |i| format!("#{i}")),
                ),
                Some(json!({
                    "playing": engine.is_playing(),
                    "position": engine.position(),
                    "segments": engine.len(),
                    "active": active,
                    "open_edits": engine.open_edits(),
                    "has_baseline": engine.store().has_baseline(),
                    "ticks": engine.ticks(),
                })),
            );
        }
        ConsoleCommand::Quit => return Ok(ConsoleFlow::Quit),
    }
    Ok(ConsoleFlow::Continue)
}

fn list_segments<C: PlaybackClock>(engine: &CaptionEngine<C>) {
    let rows = engine.renderable_segments();
    if rows.is_empty() {
        emit(Level::Info, "captions.list.empty", "No captions", None);
        return;
    }
    for row in rows {
        let marker = if row.active { "▶" } else { " " };
        let text = match (&row.mode, &row.working_text) {
            (EditMode::Editing, Some(working)) if row.modified => {
                format!("{} (editing*: {working})", row.text)
            }
            (EditMode::Editing, Some(working)) => format!("{} (editing: {working})", row.text),
            _ => row.text.clone(),
        };
        emit(
            Level::Info,
            "captions.list.row",
            &format!("{marker} #{:<3} {}  {text}", row.index, row.label),
            serde_json::to_value(&row).ok(),
        );
    }
}

/// Reads console commands line by line until `quit` or end of input.
/// Bad lines and rejected operations are reported and skipped.
pub async fn run_console<C, R>(
    engine: SharedEngine<C>,
    input: R,
    context: ConsoleContext,
) -> Result<()>
where
    C: PlaybackClock,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("reading console input")? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(err) => {
                emit(
                    Level::Warn,
                    "captions.console.invalid",
                    &format!("{err:#}. {CONSOLE_HELP}"),
                    None,
                );
                continue;
            }
        };

        let flow = {
            let mut guard = engine.lock().await;
            execute(&mut guard, command, &context)
        };

        match flow {
            Ok(ConsoleFlow::Quit) => break,
            Ok(ConsoleFlow::Continue) => {}
            Err(err) => {
                let level = match err.downcast_ref::<CaptionError>() {
                    Some(caption_err) if caption_err.is_benign() => Level::Info,
                    _ => Level::Warn,
                };
                emit(level, "captions.console.rejected", &format!("{err:#}"), None);
            }
        }
    }
    Ok(())
}
