//! Terminal implementations of the feedback and result collaborators.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use pizza_brawl_core::RoundSummary;
use pizza_brawl_rendering::{Cue, FeedbackSink, ResultSink};
use tracing::{debug, info};

use crate::summary_transfer;

/// Feedback sink that reports cues through the log instead of a speaker.
#[derive(Debug, Default)]
pub(crate) struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn play(&mut self, cue: Cue) -> Result<()> {
        let tone = cue.tone();
        debug!(
            ?cue,
            frequency = tone.frequency,
            waveform = ?tone.waveform,
            duration_ms = tone.duration.as_millis() as u64,
            "cue_played"
        );
        Ok(())
    }
}

/// Result sink that prints the summary and its transfer string.
#[derive(Debug)]
pub(crate) struct ConsoleResults<W> {
    writer: W,
    export_path: Option<PathBuf>,
}

impl ConsoleResults<io::Stdout> {
    pub(crate) fn stdout(export_path: Option<PathBuf>) -> Self {
        Self::new(io::stdout(), export_path)
    }
}

impl<W: Write> ConsoleResults<W> {
    pub(crate) fn new(writer: W, export_path: Option<PathBuf>) -> Self {
        Self {
            writer,
            export_path,
        }
    }
}

impl<W: Write> ResultSink for ConsoleResults<W> {
    fn submit(&mut self, summary: &RoundSummary) -> Result<()> {
        let encoded =
            summary_transfer::encode(summary).context("failed to encode round summary")?;

        writeln!(
            self.writer,
            "You: {} points from {} deliveries",
            summary.player_score, summary.player_deliveries
        )?;
        writeln!(
            self.writer,
            "Bot: {} points from {} recipes",
            summary.bot_score, summary.bot_deliveries
        )?;
        writeln!(self.writer, "Logged actions: {}", summary.move_log.len())?;
        writeln!(self.writer, "{encoded}")?;
        self.writer.flush()?;

        if let Some(path) = &self.export_path {
            fs::write(path, format!("{encoded}\n"))
                .with_context(|| format!("failed to write summary to {}", path.display()))?;
            info!(path = %path.display(), "summary_exported");
        }
        Ok(())
    }
}
