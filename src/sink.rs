//! Line-oriented output for reports.
//!
//! The renderer produces one complete line per call. Where the lines go is
//! up to the sink: the tracing subscriber, an in-memory buffer or any writer.

use std::io::Write;

/// Destination for report lines.
pub trait ReportSink {
    /// Receives one line of the report, without a trailing newline.
    fn line(&mut self, line: &str);

    /// Emits an empty line.
    fn blank(&mut self) {
        self.line("");
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn line(&mut self, line: &str) {
        (**self).line(line);
    }
}

/// Forwards each line as an `INFO` event on the `equilib::report` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn line(&mut self, line: &str) {
        tracing::info!(target: "equilib::report", "{}", line);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BufferSink {
    lines: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whole report as a newline-terminated string.
    pub fn text(&self) -> String {
        self.lines.iter().map(|l| format!("{}\n", l)).collect()
    }

    /// Index of the first line containing `needle`.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.contains(needle))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.find(needle).is_some()
    }
}

impl ReportSink for BufferSink {
    fn line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Writes lines to any [`std::io::Write`].
///
/// Write errors are logged and otherwise ignored; a report is diagnostic
/// output and must not fail the solve it describes.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            tracing::warn!(error = %e, "failed to write report line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink() {
        let mut sink = BufferSink::new();
        sink.line("first");
        sink.blank();
        sink.line("third");

        assert_eq!(sink.lines().len(), 3);
        assert_eq!(sink.text(), "first\n\nthird\n");
        assert_eq!(sink.find("third"), Some(2));
        assert!(!sink.contains("fourth"));
    }

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new());
        sink.line("a");
        sink.line("b");
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_mut_ref_is_a_sink() {
        fn emit(mut sink: impl ReportSink) {
            sink.line("x");
        }
        let mut buffer = BufferSink::new();
        emit(&mut buffer);
        assert_eq!(buffer.lines(), &["x".to_string()]);
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        let mut sink = TracingSink;
        sink.line("no subscriber installed");
    }
}
