// src/utils.rs
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const ELLIPSIS: &str = "...";

/// Length in Unicode scalar values, used for the fixed display widths
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Length in UTF-16 code units, which is how Telegram counts message length
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Cut `text` on character boundaries into slices of at most `max_units` UTF-16
/// code units. A character wider than `max_units` gets a slice of its own.
pub fn split_utf16(text: &str, max_units: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut units = 0;
    for (offset, ch) in text.char_indices() {
        let width = ch.len_utf16();
        if units > 0 && units + width > max_units {
            parts.push(&text[start..offset]);
            start = offset;
            units = 0;
        }
        units += width;
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

/// Keep `text` if it fits in `width` characters, otherwise its first `keep`
/// characters followed by an ellipsis
pub fn truncate_chars(text: &str, width: usize, keep: usize) -> String {
    if char_len(text) <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Wall-clock stamp used in export file names: `2025-03-01_13-54`
pub fn file_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%Y-%m-%d_%H-%M").to_string()
}

/// Human readable stamp for captions: `2025-03-01 13:54`
pub fn caption_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%Y-%m-%d %H:%M").to_string()
}

/// Command name of a chat message: `/jobs@SomeBot extra` -> `jobs`
pub fn command_name(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    let name = command.split('@').next().unwrap_or(command);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
