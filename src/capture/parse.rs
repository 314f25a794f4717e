use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::{CaptureStreams, StreamRole};
use crate::config::MalformedPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not find {}; run the simulation first", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed sample on line {line}: {text:?}")]
    Malformed { line: usize, text: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCapture {
    pub streams: CaptureStreams,
    /// Tagged lines dropped under `MalformedPolicy::Skip`.
    pub skipped_lines: usize,
}

pub fn parse_file(path: &Path, policy: MalformedPolicy) -> Result<ParsedCapture, ParseError> {
    log::info!("Reading {}...", path.display());

    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ParseError::NotFound { path: path.to_path_buf() }
        } else {
            ParseError::Io { path: path.to_path_buf(), source }
        }
    })?;

    parse_reader(BufReader::new(file), policy).map_err(|err| match err {
        ParseError::Io { source, .. } => ParseError::Io { path: path.to_path_buf(), source },
        other => other,
    })
}

/// Parse capture lines from any reader. I/O errors carry an empty path; the
/// file-level wrapper fills it in.
pub fn parse_reader<R: BufRead>(reader: R, policy: MalformedPolicy) -> Result<ParsedCapture, ParseError> {
    let mut parsed = ParsedCapture::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ParseError::Io { path: PathBuf::new(), source })?;
        let line_no = idx + 1;
        let line = line.trim();

        let Some(role) = StreamRole::from_line(line) else {
            if !line.is_empty() {
                log::trace!("Ignoring line {}: {:?}", line_no, line);
            }
            continue;
        };

        match parse_sample(line) {
            Some(value) => parsed.streams.push(role, value),
            None => match policy {
                MalformedPolicy::Abort => {
                    return Err(ParseError::Malformed { line: line_no, text: line.to_string() });
                }
                MalformedPolicy::Skip => {
                    log::warn!("Skipping malformed {} sample on line {}: {:?}", role, line_no, line);
                    parsed.skipped_lines += 1;
                }
            },
        }
    }

    Ok(parsed)
}

// The sample is the last token; anything between the prefix and it (cycle
// counters, timestamps) is ignored.
fn parse_sample(line: &str) -> Option<i64> {
    line.split_whitespace().last()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ParsedCapture, ParseError> {
        parse_reader(text.as_bytes(), MalformedPolicy::Abort)
    }

    #[test]
    fn parses_reference_scenario() {
        let parsed = parse("IN: 15000\nIN: -15000\nMID: 30000\nOUT: 0\n").unwrap();
        assert_eq!(parsed.streams.input, vec![15000, -15000]);
        assert_eq!(parsed.streams.intermediate, vec![30000]);
        assert_eq!(parsed.streams.output, vec![0]);
        assert_eq!(parsed.skipped_lines, 0);
    }

    #[test]
    fn empty_input_gives_empty_streams() {
        let parsed = parse("").unwrap();
        assert_eq!(parsed.streams, CaptureStreams::default());
    }

    #[test]
    fn unknown_prefix_is_ignored() {
        let parsed = parse("GARBAGE: 123\n# comment\n\nIN: 1\n").unwrap();
        assert_eq!(parsed.streams.input, vec![1]);
        assert!(parsed.streams.intermediate.is_empty());
        assert!(parsed.streams.output.is_empty());
    }

    #[test]
    fn takes_last_token_and_trims() {
        let parsed = parse("   IN: t=120ns  -42  \nOUT:\t+7\n").unwrap();
        assert_eq!(parsed.streams.input, vec![-42]);
        assert_eq!(parsed.streams.output, vec![7]);
    }

    #[test]
    fn preserves_order_and_counts_per_prefix() {
        let mut text = String::new();
        for i in 0..50 {
            text.push_str(&format!("IN: {}\n", i));
            if i % 2 == 0 {
                text.push_str(&format!("MID: {}\n", -i));
            }
            if i % 5 == 0 {
                text.push_str(&format!("OUT: {}\n", i * 10));
            }
        }
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.streams.input, (0..50).collect::<Vec<i64>>());
        assert_eq!(parsed.streams.intermediate.len(), 25);
        assert_eq!(parsed.streams.intermediate[3], -6);
        assert_eq!(parsed.streams.output, vec![0, 50, 100, 150, 200, 250, 300, 350, 400, 450]);
    }

    #[test]
    fn malformed_aborts_with_line_number() {
        let err = parse("IN: 1\nMID: 2\nOUT: 3.5\n").unwrap_err();
        match err {
            ParseError::Malformed { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "OUT: 3.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bare_prefix_is_malformed() {
        let err = parse("IN:\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 1, .. }));
    }

    #[test]
    fn skip_policy_drops_and_counts() {
        let parsed = parse_reader(
            "IN: 1\nIN: oops\nIN: 3\nMID: x\n".as_bytes(),
            MalformedPolicy::Skip,
        )
        .unwrap();
        assert_eq!(parsed.streams.input, vec![1, 3]);
        assert!(parsed.streams.intermediate.is_empty());
        assert_eq!(parsed.skipped_lines, 2);
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("resplot-definitely-missing.txt");
        let err = parse_file(&path, MalformedPolicy::Abort).unwrap_err();
        assert!(matches!(err, ParseError::NotFound { .. }));
        assert!(err.to_string().contains("resplot-definitely-missing.txt"));
    }

    #[test]
    fn parses_file_from_disk() {
        let path = std::env::temp_dir().join(format!("resplot-parse-{}.txt", std::process::id()));
        std::fs::write(&path, "IN: 10\nOUT: -10\n").unwrap();
        let parsed = parse_file(&path, MalformedPolicy::Abort);
        std::fs::remove_file(&path).ok();
        let parsed = parsed.unwrap();
        assert_eq!(parsed.streams.input, vec![10]);
        assert_eq!(parsed.streams.output, vec![-10]);
    }
}
