use crate::libmondai::error::{Error, Result};
use log::{debug, trace, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything up to and including this marker is document preamble.
const PREAMBLE_MARKER: &str = "MULTIPLE CHOICE";
const ANSWER_MARKER: &str = "ANS:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    /// Number as authored; not necessarily contiguous or sorted.
    pub number: u64,
    pub stem: String,
    pub options: BTreeMap<char, String>,
    /// Lowercase option letter. Never checked against `options`.
    pub answer: char,
}

/// Parses normalized text into question records, in order of appearance.
///
/// Blocks that do not open with a bare `<number>.` line are skipped. A
/// question without an `ANS:` marker fails the whole document.
pub fn parse(text: &str) -> Result<Vec<QuestionRecord>> {
    let text = skip_preamble(text);
    let mut records = Vec::new();

    for block in split_blocks(text) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        match parse_block(block)? {
            Some(record) => {
                trace!("[Parse] {:?}", record);
                records.push(record);
            }
            None => debug!(
                "[Parse] Skipping block starting with {:?}",
                block.lines().next().unwrap_or_default()
            ),
        }
    }

    debug!("[Parse] Parsed {} questions.", records.len());
    Ok(records)
}

fn skip_preamble(text: &str) -> &str {
    match text.split_once(PREAMBLE_MARKER) {
        Some((_, rest)) => rest,
        None => text,
    }
}

/// `1.`, `12. Foo` etc. Only the start of the line counts.
fn starts_with_number(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with('.')
}

/// Splits `text` before every line that starts with a question number.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in text.split('\n') {
        if starts_with_number(line) {
            blocks.push(Vec::new());
        }
        if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }
    blocks.into_iter().map(|lines| lines.join("\n")).collect()
}

fn parse_block(block: &str) -> Result<Option<QuestionRecord>> {
    let Some((head, body)) = block.split_once('\n') else {
        return Ok(None);
    };
    let Some(digits) = head.strip_suffix('.') else {
        return Ok(None);
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let Ok(number) = digits.parse::<u64>() else {
        warn!("[Parse] Question number {} is out of range, dropping it", digits);
        return Ok(None);
    };

    let answer = find_answer(body).ok_or(Error::MissingAnswer { number })?;
    let body = match body.split_once(ANSWER_MARKER) {
        Some((before, _)) => before,
        None => body,
    };

    let mut stem: Vec<&str> = Vec::new();
    let mut options: Vec<(char, Vec<&str>)> = Vec::new();
    // A bare `a.` takes the next line as its text, whatever that line is.
    let mut after_bare_marker = false;
    let mut lines = body.split('\n').peekable();
    while let Some(line) = lines.next() {
        let marker = if after_bare_marker {
            None
        } else {
            option_marker(line).filter(|(_, rest)| !rest.is_empty() || lines.peek().is_some())
        };
        after_bare_marker = false;
        match marker {
            Some((letter, rest)) => {
                after_bare_marker = rest.is_empty();
                options.push((letter, vec![rest]));
            }
            None => match options.last_mut() {
                Some((_, text)) => text.push(line),
                None => stem.push(line),
            },
        }
    }

    Ok(Some(QuestionRecord {
        number,
        stem: collapse_lines(&stem),
        options: options
            .into_iter()
            .map(|(letter, lines)| (letter, collapse_lines(&lines)))
            .collect(),
        answer,
    }))
}

/// First `ANS:` followed (after optional whitespace) by a letter A-D.
fn find_answer(body: &str) -> Option<char> {
    body.match_indices(ANSWER_MARKER).find_map(|(idx, _)| {
        body[idx + ANSWER_MARKER.len()..]
            .trim_start()
            .chars()
            .next()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| ('a'..='d').contains(c))
    })
}

/// `a. text` through `d. text`, or a bare `a.` whose text is on the next
/// line. Whitespace must follow the period.
fn option_marker(line: &str) -> Option<(char, &str)> {
    let mut chars = line.chars();
    let letter = chars.next().filter(|c| ('a'..='d').contains(c))?;
    let rest = chars.as_str().strip_prefix('.')?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace))
        .then(|| (letter, rest.trim_start()))
}

/// Joins lines with single spaces, skipping empty ones, and trims.
fn collapse_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
