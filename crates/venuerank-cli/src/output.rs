use std::io::Write;

use owo_colors::OwoColorize;
use venuerank_core::MatchTrace;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print one resolution result.
pub fn print_resolution(
    w: &mut dyn Write,
    title: &str,
    rank: Option<&str>,
    color: ColorMode,
) -> std::io::Result<()> {
    match rank {
        Some(rank) => {
            if color.enabled() {
                writeln!(w, "{} -> {}", title, rank.green().bold())
            } else {
                writeln!(w, "{} -> {}", title, rank)
            }
        }
        None => {
            if color.enabled() {
                writeln!(w, "{} -> {}", title, "no ranking found".dimmed())
            } else {
                writeln!(w, "{} -> no ranking found", title)
            }
        }
    }
}

/// Print the strategy trace, one attempt per line.
pub fn print_trace(w: &mut dyn Write, trace: &MatchTrace, color: ColorMode) -> std::io::Result<()> {
    for step in trace.steps() {
        if color.enabled() {
            writeln!(w, "  {}", step.dimmed())?;
        } else {
            writeln!(w, "  {}", step)?;
        }
    }
    Ok(())
}

/// One row per registered source: id, name, priority, enabled.
pub fn print_sources(
    w: &mut dyn Write,
    sources: &[(String, String, i32, bool)],
    color: ColorMode,
) -> std::io::Result<()> {
    if sources.is_empty() {
        writeln!(w, "No sources registered")?;
        return Ok(());
    }
    for (id, name, priority, enabled) in sources {
        let status = if *enabled { "enabled" } else { "disabled" };
        if color.enabled() && !*enabled {
            writeln!(
                w,
                "{:<8} {:<30} priority {:<4} {}",
                id,
                name,
                priority,
                status.dimmed()
            )?;
        } else {
            writeln!(
                w,
                "{:<8} {:<30} priority {:<4} {}",
                id, name, priority, status
            )?;
        }
    }
    Ok(())
}

/// All overrides, one `title -> rank` row per line.
pub fn print_overrides(
    w: &mut dyn Write,
    overrides: &[(String, String)],
    color: ColorMode,
) -> std::io::Result<()> {
    if overrides.is_empty() {
        writeln!(w, "No overrides set")?;
        return Ok(());
    }
    for (title, rank) in overrides {
        if color.enabled() {
            writeln!(w, "{} -> {}", title, rank.green())?;
        } else {
            writeln!(w, "{} -> {}", title, rank)?;
        }
    }
    writeln!(w)?;
    writeln!(w, "{} override(s)", overrides.len())?;
    Ok(())
}

/// Batch run summary.
pub fn print_batch_summary(
    w: &mut dyn Write,
    resolved: usize,
    total: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(
            w,
            "Resolved {} of {} titles",
            resolved.to_string().green().bold(),
            total
        )
    } else {
        writeln!(w, "Resolved {} of {} titles", resolved, total)
    }
}
