//! Cursor-based parser for snapshot documents.
//!
//! The grammar is line-oriented with one multi-line form. At the start of
//! each line the cursor checks the header prefixes in the fixed order of
//! [`HeaderKind::ALL`]; a line that opens no header is consumed verbatim as
//! a moment line. Once a prefix matches, the parser is committed: a payload
//! that does not fit the header's grammar is a hard error, never a fallback
//! to a moment line. Annotation bodies are captured by searching for the
//! next ``` fence, so the whole parse is a single forward pass.

use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::error::{MdlError, Result};
use crate::snapshot::line::{HeaderKind, SnapshotLine, Timestamp};

/// Opening and closing fence of an annotation block.
const FENCE: &str = "```";

/// Width of a hyphenated UUID in bytes.
const UUID_LEN: usize = 36;

/// Parse a complete document into its line sequence.
#[instrument(skip(input), fields(bytes = input.len()))]
pub(crate) fn parse_lines(input: &str) -> Result<Vec<SnapshotLine>> {
    Cursor::new(input).run()
}

/// Forward-only position in the input, tracking the 1-based line number
/// for error reporting. Invariant: between lines the cursor always sits at
/// the start of a line, so header prefixes never match mid-line.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    fn run(mut self) -> Result<Vec<SnapshotLine>> {
        let mut lines = Vec::new();
        while self.pos < self.input.len() {
            lines.push(self.next_line()?);
        }
        debug!(lines = lines.len(), "Parsed snapshot document");
        Ok(lines)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn next_line(&mut self) -> Result<SnapshotLine> {
        for kind in HeaderKind::ALL {
            if self.rest().starts_with(kind.prefix()) {
                return self.header(kind);
            }
        }
        Ok(SnapshotLine::MomentLine(self.take_moment_line()))
    }

    /// Parse one header whose prefix has already matched.
    fn header(&mut self, kind: HeaderKind) -> Result<SnapshotLine> {
        let opened_at = self.line;
        self.pos += kind.prefix().len();
        trace!(header = %kind, line = opened_at, "Matched header prefix");

        if self.eat_hspace() == 0 {
            return Err(malformed(opened_at, kind, "expected a space after the colon"));
        }

        let parsed = match kind {
            HeaderKind::MomentId => SnapshotLine::MomentId(self.uuid_payload(opened_at, kind)?),
            HeaderKind::SnapshotId => {
                SnapshotLine::SnapshotId(self.uuid_payload(opened_at, kind)?)
            }
            HeaderKind::PreviousSnapshotId => {
                SnapshotLine::PreviousSnapshotId(self.uuid_payload(opened_at, kind)?)
            }
            HeaderKind::Timestamp => SnapshotLine::Timestamp(self.timestamp_payload(opened_at)?),
            HeaderKind::Annotations => {
                SnapshotLine::Annotations(self.annotations_payload(opened_at)?)
            }
        };

        if !self.eat_terminator() {
            return Err(malformed(opened_at, kind, "expected end of line after the value"));
        }
        Ok(parsed)
    }

    /// Everything up to the next terminator, verbatim.
    fn take_moment_line(&mut self) -> String {
        let rest = self.rest();
        let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
        let text = rest[..end].to_string();
        self.pos += end;
        self.eat_terminator();
        text
    }

    /// A UUID payload: exactly 36 bytes of lowercase hyphenated hex.
    fn uuid_payload(&mut self, opened_at: usize, kind: HeaderKind) -> Result<Uuid> {
        let uuid = self
            .rest()
            .get(..UUID_LEN)
            .filter(|s| is_uuid_shape(s))
            .and_then(|s| Uuid::parse_str(s).ok());
        let Some(uuid) = uuid else {
            return Err(malformed(
                opened_at,
                kind,
                "expected a lowercase hyphenated UUID (8-4-4-4-12 hex)",
            ));
        };
        self.pos += UUID_LEN;
        trace!(header = %kind, %uuid, "Parsed UUID payload");
        Ok(uuid)
    }

    fn timestamp_payload(&mut self, opened_at: usize) -> Result<Timestamp> {
        match Timestamp::scan(self.rest()) {
            Ok((ts, used)) => {
                self.pos += used;
                trace!(timestamp = %ts, "Parsed timestamp payload");
                Ok(ts)
            }
            Err(expected) => Err(malformed(opened_at, HeaderKind::Timestamp, expected)),
        }
    }

    /// The fenced annotation body. The opening fence must follow the header
    /// whitespace; the body runs to the nearest closing fence, terminators
    /// included, and is kept verbatim.
    fn annotations_payload(&mut self, opened_at: usize) -> Result<String> {
        let Some(after_fence) = self.rest().strip_prefix(FENCE) else {
            return Err(malformed(
                opened_at,
                HeaderKind::Annotations,
                "expected an opening ``` fence",
            ));
        };
        self.pos += FENCE.len();

        let Some(body_len) = after_fence.find(FENCE) else {
            return Err(MdlError::UnterminatedAnnotations { line: opened_at });
        };
        let body = &after_fence[..body_len];
        self.line += count_terminators(body);
        self.pos += body_len + FENCE.len();
        trace!(bytes = body.len(), "Captured annotation body");
        Ok(body.to_string())
    }

    /// Consume spaces and tabs, returning how many bytes were eaten.
    fn eat_hspace(&mut self) -> usize {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Consume one line terminator (`\r\n`, `\n` or `\r`). End of input
    /// counts as terminated.
    fn eat_terminator(&mut self) -> bool {
        let rest = self.rest();
        if rest.is_empty() {
            return true;
        }
        if rest.starts_with("\r\n") {
            self.pos += 2;
            self.line += 1;
            return true;
        }
        if rest.starts_with(['\n', '\r']) {
            self.pos += 1;
            self.line += 1;
            return true;
        }
        false
    }
}

fn malformed(line: usize, header: HeaderKind, expected: impl Into<String>) -> MdlError {
    MdlError::MalformedHeader {
        line,
        header,
        expected: expected.into(),
    }
}

/// Shape check for the strict UUID form accepted in headers.
fn is_uuid_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == UUID_LEN
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
        })
}

/// Number of line terminators in `text`, counting `\r\n` once.
fn count_terminators(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                count += 1;
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
            }
            b'\n' => {
                count += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    count
}
