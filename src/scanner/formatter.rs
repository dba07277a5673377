use std::io::{self, Write};

use super::aggregate::{ResultSink, ScanSummary};
use super::entry::ScanResult;
use super::size::format_size;

/// Width of the separator line above the summary
const RULE_WIDTH: usize = 60;

/// Format one result as a report line
pub fn format_line(result: &ScanResult) -> String {
    format!(
        "[STALE] {:<10} {:>10} | {} ({})",
        result.kind,
        format_size(result.size),
        result.path.display(),
        result.modified_local().format("%Y-%m-%d"),
    )
}

/// Format the closing summary line
pub fn format_summary(summary: &ScanSummary) -> String {
    format!(
        "Summary: Found {} folder{} | Total Space: {}",
        summary.count,
        if summary.count == 1 { "" } else { "s" },
        format_size(summary.total_size)
    )
}

/// Writes one line per result as it arrives, then a summary.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for TextReporter<W> {
    fn accept(&mut self, result: ScanResult) -> io::Result<()> {
        writeln!(self.out, "{}", format_line(&result))
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.out, "{}", format_summary(summary))?;
        self.out.flush()
    }
}

/// Buffers results and writes them as one pretty-printed JSON array.
pub struct JsonReporter<W: Write> {
    out: W,
    results: Vec<ScanResult>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            results: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonReporter<W> {
    fn accept(&mut self, result: ScanResult) -> io::Result<()> {
        self.results.push(result);
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> io::Result<()> {
        // Encode fully before writing so a failure never leaves half an array.
        let mut encoded = serde_json::to_vec_pretty(&self.results)?;
        encoded.push(b'\n');
        self.out.write_all(&encoded)?;
        self.out.flush()
    }
}
