//! Line-level types for MDL snapshot documents.
//!
//! A snapshot document is an ordered sequence of lines. Five header forms
//! are recognized; every other line is an opaque moment line. [`SnapshotLine`]
//! models one parsed line, [`HeaderKind`] names the recognized headers and
//! fixes their match order, and [`Timestamp`] pairs a header timestamp with
//! the lexeme it was written as.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The recognized `# ...:` header forms.
///
/// Matching is ordered: when a line is checked against the headers, the
/// first kind in [`HeaderKind::ALL`] whose prefix matches wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    /// `# Moment ID: <uuid>`
    MomentId,

    /// `# Snapshot ID: <uuid>`
    SnapshotId,

    /// `# Previous Snapshot ID: <uuid>`
    PreviousSnapshotId,

    /// `# Timestamp: <iso-8601 instant>`
    Timestamp,

    /// `# Annotations:` followed by a ``` fenced block, possibly spanning lines.
    Annotations,
}

impl HeaderKind {
    /// All header kinds, in match priority order.
    pub const ALL: [Self; 5] = [
        Self::MomentId,
        Self::SnapshotId,
        Self::PreviousSnapshotId,
        Self::Timestamp,
        Self::Annotations,
    ];

    /// The literal prefix that opens this header, colon included.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::MomentId => "# Moment ID:",
            Self::SnapshotId => "# Snapshot ID:",
            Self::PreviousSnapshotId => "# Previous Snapshot ID:",
            Self::Timestamp => "# Timestamp:",
            Self::Annotations => "# Annotations:",
        }
    }

    /// Header name as used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MomentId => "Moment ID",
            Self::SnapshotId => "Snapshot ID",
            Self::PreviousSnapshotId => "Previous Snapshot ID",
            Self::Timestamp => "Timestamp",
            Self::Annotations => "Annotations",
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `# Timestamp:` header value.
///
/// Keeps the original lexeme alongside the parsed instant so a document
/// re-serializes byte-for-byte: `Z` stays `Z`, `+00:00` stays `+00:00`,
/// and the fractional digit count is preserved.
#[derive(Debug, Clone)]
pub struct Timestamp {
    raw: Box<str>,
    instant: DateTime<FixedOffset>,
}

impl Timestamp {
    /// Current UTC time, rendered with microsecond precision.
    #[must_use]
    pub fn now() -> Self {
        Self::from_instant(Utc::now().fixed_offset())
    }

    /// Wrap an instant, rendering the lexeme as microsecond RFC 3339.
    #[must_use]
    pub fn from_instant(instant: DateTime<FixedOffset>) -> Self {
        let raw: Box<str> = instant.to_rfc3339_opts(SecondsFormat::Micros, false).into();
        // Reparse so sub-microsecond digits dropped from the lexeme are
        // also dropped from the stored instant.
        let instant = DateTime::parse_from_rfc3339(&raw).unwrap_or(instant);
        Self { raw, instant }
    }

    /// The timestamp exactly as written in the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Match a timestamp at the start of `input`.
    ///
    /// Returns the parsed value and the number of bytes consumed, or a
    /// description of what was expected. The shape is
    /// `YYYY-MM-DDTHH:MM:SS` with optional `.` plus one to six fractional
    /// digits, closed by `Z` or a `+HH:MM`/`-HH:MM` offset. The matched
    /// text must also name a real instant.
    pub(crate) fn scan(input: &str) -> std::result::Result<(Self, usize), String> {
        fn eat_digits(bytes: &[u8], pos: usize, n: usize) -> Option<usize> {
            let end = pos.checked_add(n)?;
            (end <= bytes.len() && bytes[pos..end].iter().all(u8::is_ascii_digit)).then_some(end)
        }
        fn eat_byte(bytes: &[u8], pos: usize, b: u8) -> Option<usize> {
            (bytes.get(pos) == Some(&b)).then_some(pos + 1)
        }

        let bytes = input.as_bytes();
        let date_time = eat_digits(bytes, 0, 4)
            .and_then(|p| eat_byte(bytes, p, b'-'))
            .and_then(|p| eat_digits(bytes, p, 2))
            .and_then(|p| eat_byte(bytes, p, b'-'))
            .and_then(|p| eat_digits(bytes, p, 2))
            .and_then(|p| eat_byte(bytes, p, b'T'))
            .and_then(|p| eat_digits(bytes, p, 2))
            .and_then(|p| eat_byte(bytes, p, b':'))
            .and_then(|p| eat_digits(bytes, p, 2))
            .and_then(|p| eat_byte(bytes, p, b':'))
            .and_then(|p| eat_digits(bytes, p, 2));
        let Some(mut pos) = date_time else {
            return Err("expected an ISO-8601 instant (YYYY-MM-DDTHH:MM:SS)".to_string());
        };

        // Optional fractional seconds, one to six digits.
        if bytes.get(pos) == Some(&b'.') {
            let start = pos + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end == start {
                return Err("expected digits after the decimal point".to_string());
            }
            if end - start > 6 {
                return Err("fractional seconds take at most 6 digits".to_string());
            }
            pos = end;
        }

        // Zone designator: Z or a numeric offset.
        pos = match bytes.get(pos) {
            Some(b'Z') => pos + 1,
            Some(b'+' | b'-') => {
                let offset = eat_digits(bytes, pos + 1, 2)
                    .and_then(|p| eat_byte(bytes, p, b':'))
                    .and_then(|p| eat_digits(bytes, p, 2));
                match offset {
                    Some(p) => p,
                    None => return Err("expected a UTC offset like +00:00".to_string()),
                }
            }
            _ => return Err("expected a zone designator (Z, +HH:MM or -HH:MM)".to_string()),
        };

        let lexeme = &input[..pos];
        let instant = DateTime::parse_from_rfc3339(lexeme)
            .map_err(|e| format!("'{lexeme}' is not a real instant: {e}"))?;
        Ok((
            Self {
                raw: lexeme.into(),
                instant,
            },
            pos,
        ))
    }

    /// Parse a complete string as a timestamp, rejecting trailing input.
    pub(crate) fn parse_full(s: &str) -> std::result::Result<Self, String> {
        let (ts, used) = Self::scan(s)?;
        if used != s.len() {
            return Err(format!(
                "trailing characters after timestamp: {:?}",
                &s[used..]
            ));
        }
        Ok(ts)
    }
}

/// Two timestamps are equal when they were written the same way.
impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Timestamp {}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_full(&s).map_err(serde::de::Error::custom)
    }
}

/// One parsed line of a snapshot document.
///
/// Header payloads are typed; a line that opens no recognized header is
/// kept verbatim as a [`SnapshotLine::MomentLine`]. `Display` renders the
/// line in canonical form without a trailing line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLine {
    /// `# Moment ID: <uuid>`
    MomentId(Uuid),

    /// `# Snapshot ID: <uuid>`
    SnapshotId(Uuid),

    /// `# Previous Snapshot ID: <uuid>`
    PreviousSnapshotId(Uuid),

    /// `# Timestamp: <iso-8601 instant>`
    Timestamp(Timestamp),

    /// Fenced annotation block; the body is verbatim, fences excluded.
    Annotations(String),

    /// Any other line, terminator excluded.
    MomentLine(String),
}

impl SnapshotLine {
    /// The header this line carries, or `None` for a moment line.
    #[must_use]
    pub const fn header_kind(&self) -> Option<HeaderKind> {
        match self {
            Self::MomentId(_) => Some(HeaderKind::MomentId),
            Self::SnapshotId(_) => Some(HeaderKind::SnapshotId),
            Self::PreviousSnapshotId(_) => Some(HeaderKind::PreviousSnapshotId),
            Self::Timestamp(_) => Some(HeaderKind::Timestamp),
            Self::Annotations(_) => Some(HeaderKind::Annotations),
            Self::MomentLine(_) => None,
        }
    }

    /// True for lines that belong to the moment body rather than a header.
    #[must_use]
    pub const fn is_moment_line(&self) -> bool {
        matches!(self, Self::MomentLine(_))
    }
}

impl fmt::Display for SnapshotLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MomentId(id) => write!(f, "{} {id}", HeaderKind::MomentId.prefix()),
            Self::SnapshotId(id) => write!(f, "{} {id}", HeaderKind::SnapshotId.prefix()),
            Self::PreviousSnapshotId(id) => {
                write!(f, "{} {id}", HeaderKind::PreviousSnapshotId.prefix())
            }
            Self::Timestamp(ts) => write!(f, "{} {ts}", HeaderKind::Timestamp.prefix()),
            Self::Annotations(body) => {
                write!(f, "{} ```{body}```", HeaderKind::Annotations.prefix())
            }
            Self::MomentLine(text) => f.write_str(text),
        }
    }
}
