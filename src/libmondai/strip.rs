//! Turns a raw RTF byte stream into plain text.
//!
//! This is a lossy pattern pass, not an RTF reader: escapes are decoded,
//! paragraph breaks become newlines and every other piece of markup is
//! deleted. Each step assumes the previous ones already ran.

use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\'([0-9a-fA-F]{2})").unwrap());
static RE_IGNORABLE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\\\*[^{}]*\}").unwrap());
static RE_CONTROL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+-?\d* ?").unwrap());
static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Decodes `raw` as UTF-8, silently dropping every invalid sequence.
pub fn decode_lossy(raw: &[u8]) -> String {
    raw.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Strips RTF markup from `raw`, returning plain text with newlines.
pub fn strip(raw: &[u8]) -> String {
    let text = decode_lossy(raw);
    debug!("[Strip] Decoded {} bytes into {} chars.", raw.len(), text.len());

    // \'hh shares the backslash prefix with control words, so it goes first.
    let text = RE_HEX_ESCAPE.replace_all(&text, |caps: &Captures| {
        u8::from_str_radix(&caps[1], 16)
            .map(|byte| char::from(byte).to_string())
            .unwrap_or_default()
    });

    let text = text.replace("\\par", "\n").replace("\\line", "\n");
    let text = text
        .replace("\\{", "{")
        .replace("\\}", "}")
        .replace("\\\\", "\\");

    let text = RE_IGNORABLE_GROUP.replace_all(&text, "");
    let text = RE_CONTROL_WORD.replace_all(&text, "");
    let text = text.replace(['{', '}'], "");
    let text = RE_BLANK_RUN.replace_all(&text, "\n\n");

    text.trim().to_string()
}
