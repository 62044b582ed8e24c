//! Recovers a subject/body pair from free-form LLM output.
//!
//! The model is asked to answer with
//!
//! ```text
//! SUBJECT: <subject line>
//! BODY:
//! <email body>
//! ```
//!
//! but replies drift: markers change case, the body starts on the `BODY:`
//! line itself, preamble appears before the subject, or the `BODY:` marker is
//! missing entirely. The scan below is a three-state machine:
//!
//! ```text
//! SeekSubject --[SUBJECT:]--> SeekBody --[BODY:]--> CollectingBody
//! ```
//!
//! Lines seen while in `SeekBody` are kept as the fallback body for replies
//! that never emit `BODY:`.

use crate::error::ParseError;

const SUBJECT_MARKER: &str = "SUBJECT:";
const BODY_MARKER: &str = "BODY:";

/// Subject and body recovered from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug)]
enum ScanState<'a> {
    SeekSubject,
    SeekBody {
        subject: &'a str,
        after_subject: Vec<&'a str>,
    },
    CollectingBody {
        subject: &'a str,
        body: Vec<&'a str>,
    },
}

impl<'a> ScanState<'a> {
    fn step(self, line: &'a str) -> Self {
        match self {
            ScanState::SeekSubject => match strip_marker(line, SUBJECT_MARKER) {
                Some(subject) => ScanState::SeekBody {
                    subject,
                    after_subject: Vec::new(),
                },
                None => ScanState::SeekSubject,
            },
            ScanState::SeekBody {
                subject,
                mut after_subject,
            } => match strip_marker(line, BODY_MARKER) {
                Some(inline) => {
                    let mut body = Vec::new();
                    if !inline.is_empty() {
                        body.push(inline);
                    }
                    ScanState::CollectingBody { subject, body }
                }
                None => {
                    after_subject.push(line);
                    ScanState::SeekBody {
                        subject,
                        after_subject,
                    }
                }
            },
            ScanState::CollectingBody { subject, mut body } => {
                body.push(line);
                ScanState::CollectingBody { subject, body }
            }
        }
    }

    fn finish(self) -> Result<ParsedEmail, ParseError> {
        let (subject, lines) = match self {
            ScanState::SeekSubject => return Err(ParseError::MissingSubject),
            ScanState::SeekBody {
                subject,
                after_subject,
            } => (subject, after_subject),
            ScanState::CollectingBody { subject, body } => (subject, body),
        };

        if subject.is_empty() {
            return Err(ParseError::EmptySubject);
        }

        let body = lines.join("\n").trim().to_string();
        if body.is_empty() {
            return Err(ParseError::EmptyBody);
        }

        Ok(ParsedEmail {
            subject: subject.to_string(),
            body,
        })
    }
}

/// If the trimmed line starts with `marker` (ASCII case-insensitive), returns
/// the trimmed text after it.
fn strip_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let trimmed = line.trim();
    let prefix = trimmed.get(..marker.len())?;
    if prefix.eq_ignore_ascii_case(marker) {
        Some(trimmed[marker.len()..].trim())
    } else {
        None
    }
}

/// Parses an LLM completion into a subject and body.
///
/// The first `SUBJECT:` line is required. The first `BODY:` line after it
/// starts the body, including any text on the marker line itself; without a
/// `BODY:` marker, everything after the subject line is the body. The body
/// keeps its internal line breaks and is trimmed as a whole.
pub fn parse_response(text: &str) -> Result<ParsedEmail, ParseError> {
    text.lines()
        .fold(ScanState::SeekSubject, ScanState::step)
        .finish()
}
