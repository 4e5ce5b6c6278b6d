//! Output layer for rank reports.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format`
//! 2. `LINKRANK_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use linkrank_core::RankDistribution;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 48;

/// Write a horizontal separator used by pretty human output.
fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output with section rules.
    Pretty,
    /// Plain `node: value` lines, one section per estimator.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {} // unknown value — fall through to TTY detection
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from the `--format` flag, environment, and TTY.
pub fn resolve_output_mode(format_flag: Option<OutputMode>) -> OutputMode {
    let env_val = std::env::var("LINKRANK_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, env_val.as_deref(), is_tty)
}

/// Sampling estimator result as reported to the user.
#[derive(Debug, Serialize)]
pub struct SamplingReport {
    pub samples: usize,
    pub ranks: RankDistribution,
}

/// Iterative estimator result as reported to the user.
#[derive(Debug, Serialize)]
pub struct IterationReport {
    pub iterations: usize,
    pub converged: bool,
    pub ranks: RankDistribution,
}

/// Both estimators' results for one corpus.
#[derive(Debug, Serialize)]
pub struct RankReport {
    pub sampling: SamplingReport,
    pub iteration: IterationReport,
}

/// Write `report` to `w` in the given mode.
pub fn render_report(report: &RankReport, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)
        }
        OutputMode::Text => {
            writeln!(
                w,
                "PageRank Results from Sampling (n = {})",
                report.sampling.samples
            )?;
            write_ranks(w, &report.sampling.ranks)?;
            writeln!(w, "PageRank Results from Iteration")?;
            write_ranks(w, &report.iteration.ranks)
        }
        OutputMode::Pretty => {
            writeln!(
                w,
                "PageRank Results from Sampling (n = {})",
                report.sampling.samples
            )?;
            pretty_rule(w)?;
            write_ranks(w, &report.sampling.ranks)?;
            writeln!(w)?;
            writeln!(w, "PageRank Results from Iteration")?;
            pretty_rule(w)?;
            write_ranks(w, &report.iteration.ranks)?;
            if !report.iteration.converged {
                writeln!(
                    w,
                    "  (stopped after {} iterations without converging)",
                    report.iteration.iterations
                )?;
            }
            Ok(())
        }
    }
}

fn write_ranks(w: &mut dyn Write, ranks: &RankDistribution) -> io::Result<()> {
    for (id, rank) in ranks.iter() {
        writeln!(w, "  {id}: {rank:.4}")?;
    }
    Ok(())
}
