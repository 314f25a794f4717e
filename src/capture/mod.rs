pub mod parse;

use std::fmt;

/// Which tap of the rate converter a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRole {
    Input,
    Intermediate,
    Output,
}

impl StreamRole {
    pub const ALL: [StreamRole; 3] = [StreamRole::Input, StreamRole::Intermediate, StreamRole::Output];

    /// Line prefix the testbench prints for this tap.
    pub fn prefix(self) -> &'static str {
        match self {
            StreamRole::Input => "IN:",
            StreamRole::Intermediate => "MID:",
            StreamRole::Output => "OUT:",
        }
    }

    pub fn from_line(line: &str) -> Option<StreamRole> {
        Self::ALL.into_iter().find(|role| line.starts_with(role.prefix()))
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamRole::Input => "input",
            StreamRole::Intermediate => "intermediate",
            StreamRole::Output => "output",
        };
        f.write_str(name)
    }
}

/// Raw integer samples of all three taps, in file order. Lengths are
/// independent; nothing aligns the streams to each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureStreams {
    pub input: Vec<i64>,
    pub intermediate: Vec<i64>,
    pub output: Vec<i64>,
}

impl CaptureStreams {
    pub fn push(&mut self, role: StreamRole, sample: i64) {
        match role {
            StreamRole::Input => self.input.push(sample),
            StreamRole::Intermediate => self.intermediate.push(sample),
            StreamRole::Output => self.output.push(sample),
        }
    }
}
