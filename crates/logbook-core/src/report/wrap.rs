//! Greedy word wrapping by display width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` into lines no wider than `columns`.
///
/// Explicit newlines start a new line. Runs of whitespace collapse to one
/// space. A word wider than a whole line is split at character boundaries.
/// The result always has at least one line.
#[must_use]
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), columns, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, columns: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut width = 0;

    for word in paragraph.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            width + 1 + word_width
        };

        if needed <= columns {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            width = needed;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            width = 0;
        }

        if word_width <= columns {
            current.push_str(word);
            width = word_width;
        } else {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if width + ch_width > columns && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                current.push(ch);
                width += ch_width;
            }
        }
    }

    lines.push(current);
}
