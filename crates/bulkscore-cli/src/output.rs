//! Result line formatting.

use std::borrow::Cow;

use bulkscore_client::{CustomerFit, Signal, SignalKind};
use bulkscore_core::LookupKey;

/// Strips characters that would break the quoted CSV field or the line.
fn clean(text: &str) -> String {
    text.chars()
        .filter(|&c| c != '"')
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Renders one signal with its direction glyph.
///
/// Positive signals carrying a value are shown bare; without a value they get
/// `↗`. Negative signals get `✖` and, when present, their value.
pub(crate) fn format_signal(signal: &Signal) -> String {
    let name = clean(&signal.name);
    match (signal.kind, signal.value_text()) {
        (SignalKind::Positive, Some(_)) => name,
        (SignalKind::Positive, None) => format!("\u{2197} {name}"),
        (SignalKind::Negative, Some(value)) => format!("\u{2716} {name} {}", clean(&value)),
        (SignalKind::Negative, None) => format!("\u{2716} {name}"),
        (SignalKind::Other, _) => String::new(),
    }
}

pub(crate) fn format_signals(signals: &[Signal]) -> String {
    signals
        .iter()
        .map(format_signal)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The key as the first CSV field. Keys holding `,` or `"` are quoted with
/// inner quotes doubled; everything else is written bare.
pub(crate) fn key_field(key: &LookupKey) -> Cow<'_, str> {
    let key = key.as_str();
    if key.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", key.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(key)
    }
}

/// Reads back the key written by [`key_field`] at the start of `line`.
pub(crate) fn parse_key_field(line: &str) -> String {
    let Some(quoted) = line.strip_prefix('"') else {
        return line.split(',').next().unwrap_or(line).to_string();
    };

    let mut key = String::with_capacity(quoted.len());
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
            } else {
                break;
            }
        }
        key.push(c);
    }
    key
}

/// `key,segment,score,"signals"` with no trailing newline.
pub(crate) fn format_record(key: &LookupKey, fit: &CustomerFit) -> String {
    format!(
        "{},{},{},\"{}\"",
        key_field(key),
        clean(&fit.segment),
        fit.score,
        format_signals(fit.signals())
    )
}
