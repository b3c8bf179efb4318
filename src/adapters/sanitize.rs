//! Log sanitization for patient measurements.
//!
//! Hormone measurements are patient data. Call sites log them only as
//! structured `tracing` fields at debug level (`beta_HCG_I=3.2`), and the
//! fmt layer writes every line through [`SanitizingMakeWriter`], which
//! replaces the values with `[REDACTED]`. Feature vectors printed as arrays
//! and email addresses are redacted as well.
//!
//! Input per call is capped (see `PCOS_SANITIZE_MAX_BYTES`) so a runaway log
//! line cannot stall the writer.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Default cap on bytes sanitized per call (16 KiB).
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        [
            // Named measurements, with or without quotes around the value.
            (
                r#"(?i)\b(beta_?hcg_?(?:ii|i|ratio)|amh)(\s*[:=]\s*)"?-?(?:[0-9]+(?:\.[0-9]*)?(?:e[+-]?[0-9]+)?|nan|inf)"?"#,
                "${1}${2}[REDACTED]",
            ),
            // Raw or scaled vectors printed as arrays.
            (
                r"(?i)\b(features|feature_vector|scaled|vector)(\s*[:=]\s*)\[[^\]]*\]",
                "${1}${2}[REDACTED]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
        ]
        .into_iter()
        .map(|(pattern, replacement)| Rule {
            regex: Regex::new(pattern).expect("valid sanitize regex"),
            replacement,
        })
        .collect()
    })
}

fn max_sanitize_bytes() -> usize {
    std::env::var("PCOS_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact measurement values and identifiers from `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut out = prefix.to_string();
    for rule in rules() {
        if rule.regex.is_match(&out) {
            out = rule.regex.replace_all(&out, rule.replacement).into_owned();
        }
    }

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// `MakeWriter` wrapper that sanitizes each formatted log line.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let line = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&line).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A line with no newline in sight: emit what we have.
        if self.buffer.len() > max_sanitize_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_redacts_structured_fields() {
        let line = "DEBUG running inference beta_HCG_I=12.5 beta_HCG_II=3 AMH=4.25 beta_HCG_ratio=0.2222";
        let out = sanitize(line);
        assert_eq!(
            out,
            "DEBUG running inference beta_HCG_I=[REDACTED] beta_HCG_II=[REDACTED] AMH=[REDACTED] beta_HCG_ratio=[REDACTED]"
        );
    }

    #[test]
    fn test_redacts_debug_struct_output() {
        let out = sanitize("inputs: HormoneInputs { beta_hcg_i: 1.0, beta_hcg_ii: 2e3, amh: NaN }");
        assert!(!out.contains("1.0"));
        assert!(!out.contains("2e3"));
        assert!(!out.contains("NaN"));
        assert!(out.contains("amh: [REDACTED]"));
    }

    #[test]
    fn test_redacts_vectors_and_email() {
        let out = sanitize("scaled=[0.1, -0.3, 2.0, 1.1] sent to clinic@example.org");
        assert!(out.contains("scaled=[REDACTED]"));
        assert!(out.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_leaves_plain_text_alone() {
        let line = "Loaded artifacts: classifier=random_forest (4 features)";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_truncates_large_inputs() {
        let out = sanitize_with_limit("AMH=1.0 and a long tail of text", 8);
        assert!(out.ends_with("[TRUNCATED]"));
        assert!(!out.contains("1.0"));
    }

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("sink lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_split_writes() {
        let sink = Sink::default();
        let make = SanitizingMakeWriter::new({
            let sink = sink.clone();
            move || sink.clone()
        });

        {
            let mut w = make.make_writer();
            w.write_all(b"AMH=").expect("write");
            w.write_all(b"7.5 done\n").expect("write");
            w.write_all(b"tail beta_HCG_I=2").expect("write");
        }

        let written = String::from_utf8(sink.0.lock().expect("sink lock").clone()).expect("utf8");
        assert_eq!(written, "AMH=[REDACTED] done\ntail beta_HCG_I=[REDACTED]");
    }
}
