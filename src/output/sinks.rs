//! Built-in result sinks
//!
//! - `ConsoleSink`: prints one line per record to stdout
//! - `CollectingSink`: keeps every record in memory
//! - `MultiSink`: forwards to several sinks in order

use crate::output::traits::{CrawlRecord, FetchFailure, OutputError, OutputResult, ResultSink};
use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Prints records as `found: <address> "<content>"`
///
/// Writes to stdout unless built with `with_writer`.
#[derive(Debug)]
pub struct ConsoleSink<W = Stdout> {
    out: Mutex<W>,
    /// Also print a line for every failed fetch
    show_failures: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Only print fetched pages; failures are left to the log
    pub fn pages_only() -> Self {
        Self::new().show_failures(false)
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            show_failures: true,
        }
    }

    pub fn show_failures(mut self, show: bool) -> Self {
        self.show_failures = show;
        self
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ResultSink for ConsoleSink<W> {
    fn record_page(&self, record: &CrawlRecord) -> OutputResult<()> {
        let mut out = lock(&self.out);
        writeln!(out, "found: {} {:?}", record.address, record.content)?;
        out.flush()?;
        Ok(())
    }

    fn record_failure(&self, failure: &FetchFailure) -> OutputResult<()> {
        if self.show_failures {
            let mut out = lock(&self.out);
            writeln!(out, "failed: {} ({})", failure.address, failure.error)?;
            out.flush()?;
        }
        Ok(())
    }
}

/// Keeps every record and failure in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<CrawlRecord>>,
    failures: Mutex<Vec<FetchFailure>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the records collected so far, in emission order
    pub fn records(&self) -> Vec<CrawlRecord> {
        lock(&self.records).clone()
    }

    /// Returns a copy of the failures collected so far, in emission order
    pub fn failures(&self) -> Vec<FetchFailure> {
        lock(&self.failures).clone()
    }

    /// Returns the fetched addresses, sorted
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = lock(&self.records)
            .iter()
            .map(|r| r.address.clone())
            .collect();
        addresses.sort();
        addresses
    }
}

impl ResultSink for CollectingSink {
    fn record_page(&self, record: &CrawlRecord) -> OutputResult<()> {
        lock(&self.records).push(record.clone());
        Ok(())
    }

    fn record_failure(&self, failure: &FetchFailure) -> OutputResult<()> {
        lock(&self.failures).push(failure.clone());
        Ok(())
    }
}

/// Forwards every record to each inner sink
///
/// All sinks are tried even if an earlier one fails; the first error is
/// returned.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Arc<dyn ResultSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    fn forward<F>(&self, mut call: F) -> OutputResult<()>
    where
        F: FnMut(&dyn ResultSink) -> OutputResult<()>,
    {
        let mut first_error: Option<OutputError> = None;
        for sink in &self.sinks {
            if let Err(e) = call(sink.as_ref()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl ResultSink for MultiSink {
    fn record_page(&self, record: &CrawlRecord) -> OutputResult<()> {
        self.forward(|sink| sink.record_page(record))
    }

    fn record_failure(&self, failure: &FetchFailure) -> OutputResult<()> {
        self.forward(|sink| sink.record_failure(failure))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use chrono::Utc;

    fn record(address: &str) -> CrawlRecord {
        CrawlRecord {
            address: address.to_string(),
            content: format!("content of {}", address),
            depth: 0,
            link_count: 0,
            fetched_at: Utc::now(),
        }
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn record_page(&self, _record: &CrawlRecord) -> OutputResult<()> {
            Err(OutputError::Write("sink closed".to_string()))
        }

        fn record_failure(&self, _failure: &FetchFailure) -> OutputResult<()> {
            Err(OutputError::Write("sink closed".to_string()))
        }
    }

    fn failure(address: &str) -> FetchFailure {
        FetchFailure {
            address: address.to_string(),
            depth: 1,
            error: FetchError::NotFound(address.to_string()),
        }
    }

    fn written(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_console_sink_page_line() {
        let sink = ConsoleSink::with_writer(Vec::<u8>::new());
        let mut page = record("https://golang.org/");
        page.content = "The Go Programming Language".to_string();
        sink.record_page(&page).unwrap();

        assert_eq!(
            written(sink),
            "found: https://golang.org/ \"The Go Programming Language\"\n"
        );
    }

    #[test]
    fn test_console_sink_escapes_quotes_in_content() {
        let sink = ConsoleSink::with_writer(Vec::<u8>::new());
        let mut page = record("a");
        page.content = r#"say "hi""#.to_string();
        sink.record_page(&page).unwrap();

        assert_eq!(written(sink), "found: a \"say \\\"hi\\\"\"\n");
    }

    #[test]
    fn test_console_sink_failure_line() {
        let sink = ConsoleSink::with_writer(Vec::<u8>::new());
        sink.record_failure(&failure("https://golang.org/cmd/"))
            .unwrap();

        assert_eq!(
            written(sink),
            "failed: https://golang.org/cmd/ (not found: https://golang.org/cmd/)\n"
        );
    }

    #[test]
    fn test_console_sink_can_hide_failures() {
        let sink = ConsoleSink::with_writer(Vec::<u8>::new()).show_failures(false);
        sink.record_failure(&failure("z")).unwrap();
        sink.record_page(&record("a")).unwrap();

        assert_eq!(written(sink), "found: a \"content of a\"\n");
    }

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.record_page(&record("b")).unwrap();
        sink.record_page(&record("a")).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].address, "b");
        assert_eq!(sink.addresses(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_collecting_sink_failures() {
        let sink = CollectingSink::new();
        sink.record_failure(&FetchFailure {
            address: "z".to_string(),
            depth: 0,
            error: FetchError::NotFound("z".to_string()),
        })
        .unwrap();

        assert!(sink.records().is_empty());
        assert_eq!(sink.failures().len(), 1);
    }

    #[test]
    fn test_multi_sink_reaches_every_sink() {
        let first = Arc::new(CollectingSink::new());
        let second = Arc::new(CollectingSink::new());
        let multi = MultiSink::new()
            .with(first.clone())
            .with(Arc::new(FailingSink))
            .with(second.clone());

        let result = multi.record_page(&record("a"));

        assert!(matches!(result, Err(OutputError::Write(_))));
        assert_eq!(first.records().len(), 1);
        assert_eq!(second.records().len(), 1);
    }
}
