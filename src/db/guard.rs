//! Statement boundary check for literal SQL text.
//!
//! sqlx's SQLite driver runs every statement in a query string, so a spliced
//! `; UPDATE ...` would execute. This refuses such text before it reaches the
//! driver, the way Python's `sqlite3.execute` does.

use crate::error::PitfallError;

/// Fail when anything besides whitespace and comments follows the first
/// top-level `;`.
pub fn ensure_single_statement(sql: &str) -> Result<(), PitfallError> {
    let bytes = sql.as_bytes();
    let mut i = 0;
    let mut terminated = false;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = skip_until(bytes, i + 2, b"\n");
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_until(bytes, i + 2, b"*/");
                continue;
            }
            _ if c.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            _ => {}
        }

        if terminated {
            return Err(PitfallError::MultipleStatements);
        }

        i = match c {
            b';' => {
                terminated = true;
                i + 1
            }
            b'\'' | b'"' | b'`' => skip_quoted(bytes, i + 1, c),
            b'[' => skip_until(bytes, i + 1, b"]"),
            _ => i + 1,
        };
    }
    Ok(())
}

/// Index just past `close`, or the end of input if it never appears.
fn skip_until(bytes: &[u8], from: usize, close: &[u8]) -> usize {
    bytes[from.min(bytes.len())..]
        .windows(close.len())
        .position(|w| w == close)
        .map_or(bytes.len(), |p| from + p + close.len())
}

/// Skip a quoted token where a doubled quote is an escaped one.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    i
}
