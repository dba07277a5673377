//! Consuming a result stream into totals and a caller-chosen sink.

use std::io;

use serde::Serialize;

use crate::error::{Result, TidyError};

use super::entry::ScanResult;

/// Totals over every result a scan produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Number of stale directories
    pub count: usize,
    /// Combined size of those directories in bytes
    pub total_size: u64,
}

impl ScanSummary {
    pub fn record(&mut self, result: &ScanResult) {
        self.count += 1;
        self.total_size = self.total_size.saturating_add(result.size);
    }
}

/// Destination for scan results: a printer, an encoder, or a collector.
pub trait ResultSink {
    /// Take ownership of one result, in arrival order.
    fn accept(&mut self, result: ScanResult) -> io::Result<()>;

    /// Called once after the stream has closed.
    fn finish(&mut self, _summary: &ScanSummary) -> io::Result<()> {
        Ok(())
    }
}

/// Collects results, e.g. for a later deletion selection.
impl ResultSink for Vec<ScanResult> {
    fn accept(&mut self, result: ScanResult) -> io::Result<()> {
        self.push(result);
        Ok(())
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn accept(&mut self, result: ScanResult) -> io::Result<()> {
        (**self).accept(result)
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        (**self).finish(summary)
    }
}

/// Drain `results` into `sink`, returning the final totals.
///
/// A sink error (say, a closed stdout) stops consumption and is returned;
/// dropping the remaining stream makes the walkers stop as well.
pub fn aggregate<I, S>(results: I, sink: &mut S) -> Result<ScanSummary>
where
    I: IntoIterator<Item = ScanResult>,
    S: ResultSink + ?Sized,
{
    let mut summary = ScanSummary::default();

    for result in results {
        summary.record(&result);
        sink.accept(result).map_err(TidyError::Output)?;
    }

    sink.finish(&summary).map_err(TidyError::Output)?;

    tracing::info!(
        count = summary.count,
        total_size = summary.total_size,
        "Scan finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn result(path: &str, size: u64) -> ScanResult {
        ScanResult {
            kind: "Rust".to_string(),
            path: PathBuf::from(path),
            size,
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn accept(&mut self, _result: ScanResult) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[derive(Default)]
    struct FinishCounter {
        finished: Option<ScanSummary>,
    }

    impl ResultSink for FinishCounter {
        fn accept(&mut self, _result: ScanResult) -> io::Result<()> {
            Ok(())
        }

        fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
            self.finished = Some(*summary);
            Ok(())
        }
    }

    #[test]
    fn test_aggregate_totals() {
        let mut collected: Vec<ScanResult> = Vec::new();
        let summary = aggregate(
            vec![result("/a/target", 100), result("/b/target", 250)],
            &mut collected,
        )
        .unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_size, 350);
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn test_aggregate_preserves_arrival_order() {
        let mut collected: Vec<ScanResult> = Vec::new();
        aggregate(
            vec![result("/z", 1), result("/a", 2), result("/m", 3)],
            &mut collected,
        )
        .unwrap();

        let paths: Vec<_> = collected.iter().map(|r| r.path.to_str().unwrap()).collect();
        assert_eq!(paths, vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn test_aggregate_empty_stream() {
        let mut sink = FinishCounter::default();
        let summary = aggregate(Vec::new(), &mut sink).unwrap();

        assert_eq!(summary, ScanSummary::default());
        assert_eq!(sink.finished, Some(ScanSummary::default()));
    }

    #[test]
    fn test_finish_receives_totals() {
        let mut sink = FinishCounter::default();
        aggregate(vec![result("/a", 7)], &mut sink).unwrap();

        assert_eq!(
            sink.finished,
            Some(ScanSummary {
                count: 1,
                total_size: 7
            })
        );
    }

    #[test]
    fn test_sink_error_is_reported() {
        let err = aggregate(vec![result("/a", 1)], &mut FailingSink).unwrap_err();

        assert!(matches!(err, TidyError::Output(_)));
    }
}
