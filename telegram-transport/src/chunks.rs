//! Splitting of outgoing text to fit `sendMessage`.

/// Bot API limit for one message, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Splits `text` into pieces of at most `limit` UTF-16 units.
///
/// Cuts prefer the last line break, then the last space, inside each window;
/// the separator at a cut is dropped. A window without either is cut hard on a
/// char boundary. `limit` must be at least 2.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;

    while utf16_len(rest) > limit {
        let hard = window_end(rest, limit);
        let window = &rest[..hard];
        let soft = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&at| at > 0);

        match soft {
            Some(at) => {
                parts.push(&rest[..at]);
                rest = &rest[at + 1..];
            }
            None => {
                parts.push(window);
                rest = &rest[hard..];
            }
        }
    }

    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the longest prefix that fits in `limit` UTF-16 units.
fn window_end(s: &str, limit: usize) -> usize {
    let mut units = 0;
    for (at, c) in s.char_indices() {
        units += c.len_utf16();
        if units > limit {
            return at;
        }
    }
    s.len()
}
