//! UI Builder module for creating keyboards and splitting messages

use teloxide::types::{KeyboardButton, KeyboardMarkup};

/// Telegram rejects text messages longer than this many characters
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// One-time reply keyboard with one choice per row, in the given order
pub fn create_choice_keyboard(choices: &[String]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = choices
        .iter()
        .map(|choice| vec![KeyboardButton::new(choice.clone())])
        .collect();

    KeyboardMarkup::new(rows).resize_keyboard().one_time_keyboard()
}

/// Split `text` into chunks of at most `limit` characters.
///
/// Cuts happen at line breaks when possible; a single line longer than
/// `limit` is cut at character boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        // +1 for the newline joining it to the current chunk
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            let mut pieces = chars.chunks(limit).map(|piece| piece.iter().collect::<String>());
            let mut last = pieces.next().unwrap_or_default();
            for piece in pieces {
                chunks.push(std::mem::replace(&mut last, piece));
            }
            current_len = last.chars().count();
            current = last;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
