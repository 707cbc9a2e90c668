use anyhow::{Context, Result, bail};

use super::segment::Segment;

/// Parses SubRip cues into segments, keeping file order.
pub fn parse_srt(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(line) = lines.next() {
        let index_line = line.trim().trim_start_matches('\u{feff}');
        if index_line.is_empty() {
            continue;
        }

        // The numeric index is optional in practice; a timestamp line may come first
        let times = if index_line.contains("-->") {
            index_line
        } else {
            lines
                .next()
                .map(str::trim)
                .context("SRT cue is missing a timestamp line")?
        };

        let (start_raw, end_raw) = times
            .split_once("-->")
            .map(|(a, b)| (a.trim(), b.trim()))
            .context("SRT cue timestamp line must contain '-->'")?;

        let start = parse_timestamp(start_raw)
            .with_context(|| format!("Failed to parse SRT start timestamp '{start_raw}'"))?;
        let end = parse_timestamp(end_raw)
            .with_context(|| format!("Failed to parse SRT end timestamp '{end_raw}'"))?;

        let mut text_lines = Vec::new();
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() {
                break;
            }
            if let Some(text) = lines.next() {
                text_lines.push(text.trim().to_string());
            }
        }

        segments.push(Segment::new(start, end, text_lines.join(" ")));
    }

    Ok(segments)
}

/// Parses `HH:MM:SS,mmm` (or `.mmm`) into seconds.
fn parse_timestamp(value: &str) -> Result<f64> {
    let cleaned = value.trim().replace(',', ".");
    let (time_part, fractional_part) = cleaned
        .split_once('.')
        .unwrap_or((cleaned.as_str(), "0"));

    let mut hms = time_part.split(':');
    let hours = hms
        .next()
        .context("Timestamp missing hours")?
        .parse::<u64>()
        .context("Invalid hours in timestamp")?;
    let minutes = hms
        .next()
        .context("Timestamp missing minutes")?
        .parse::<u64>()
        .context("Invalid minutes in timestamp")?;
    let seconds = hms
        .next()
        .context("Timestamp missing seconds")?
        .parse::<u64>()
        .context("Invalid seconds in timestamp")?;

    if hms.next().is_some() {
        bail!("Timestamp has more than three components: {value}");
    }

    let mut millis_str: String = fractional_part.chars().take(3).collect();
    while millis_str.len() < 3 {
        millis_str.push('0');
    }
    let millis = millis_str
        .parse::<u64>()
        .context("Invalid millisecond component in timestamp")?;

    let total_millis = hours
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(minutes.checked_mul(60)?))
        .and_then(|secs| secs.checked_add(seconds))
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .with_context(|| format!("timestamp out of range: {value}"))?;
    Ok(total_millis as f64 / 1000.0)
}

fn format_timestamp(seconds: f64) -> String {
    let ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

/// Writes segments as SubRip text.
pub fn write_srt(segments: &[Segment]) -> String {
    let mut output = String::new();
    for (i, segment) in segments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(segment.start),
            format_timestamp(segment.end)
        ));
        // a blank line would end the cue early
        for line in segment.text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }
    output
}
