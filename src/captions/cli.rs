use clap::{Args, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum CaptionCommands {
    /// Validate a caption file and show statistics
    Check(CheckArgs),
    /// Export a plain-text caption transcript with style metadata
    Transcript(TranscriptArgs),
    /// Export the captions as SubRip (.srt)
    Srt(SrtArgs),
    /// Run the sync loop over a list of playback positions and print the events
    Resolve(ResolveArgs),
    /// Print the render request that would be sent to the renderer
    RenderRequest(RenderRequestArgs),
    /// Play captions in real time with an interactive editing console on stdin
    Play(PlayArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Caption file (generation response JSON, segment list JSON, or SRT)
    #[arg(value_hint = ValueHint::FilePath)]
    pub captions: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TranscriptArgs {
    /// Caption file (generation response JSON, segment list JSON, or SRT)
    #[arg(value_hint = ValueHint::FilePath)]
    pub captions: PathBuf,

    /// Write the transcript to this file instead of stdout
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,

    /// Project name for the header (defaults to the configured project name)
    #[arg(long)]
    pub project: Option<String>,

    /// Omit the generation timestamp from the header
    #[arg(long)]
    pub no_timestamp: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SrtArgs {
    /// Caption file (generation response JSON, segment list JSON, or SRT)
    #[arg(value_hint = ValueHint::FilePath)]
    pub captions: PathBuf,

    /// Write the SRT to this file instead of stdout
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Caption file (generation response JSON, segment list JSON, or SRT)
    #[arg(value_hint = ValueHint::FilePath)]
    pub captions: PathBuf,

    /// Playback positions in seconds, sampled in order
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub times: Vec<f64>,

    /// Treat each position as a seek while paused instead of a playback tick
    #[arg(long)]
    pub seek: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderRequestArgs {
    /// Caption file (generation response JSON, segment list JSON, or SRT)
    #[arg(value_hint = ValueHint::FilePath)]
    pub captions: PathBuf,

    /// Media file the captions belong to
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub media: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Caption file (generation response JSON, segment list JSON, or SRT)
    #[arg(value_hint = ValueHint::FilePath)]
    pub captions: PathBuf,

    /// Start paused; use `play` in the console to begin
    #[arg(long)]
    pub paused: bool,

    /// Override the configured playback rate
    #[arg(long)]
    pub rate: Option<f64>,
}
