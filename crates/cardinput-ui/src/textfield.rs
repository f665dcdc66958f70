//! Controlled text input.
//!
//! The value shown in a card field belongs to the State Provider, so the
//! input never stores text. It keeps a caret and turns a keystroke plus the
//! current value into the *next* raw value, which the field forwards through
//! `on_change`. When the provider answers with a reformatted value the caret
//! is re-synced to it.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextEdit {
    Insert(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// Byte offset into the current value, always on a grapheme boundary.
    pub caret: usize,
    /// Length of the value the caret was last placed in.
    last_len: usize,
    /// Value and caret before the last text edit, until the next sync.
    before_edit: Option<(String, usize)>,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `edit` to `value`. Returns the new text when it differs;
    /// caret-only edits return `None`.
    pub fn apply(&mut self, value: &str, edit: TextEdit) -> Option<String> {
        let pos = clamp_to_char_boundary(value, self.caret);
        let (next, caret) = match edit {
            TextEdit::Insert(s) => {
                if s.is_empty() {
                    return None;
                }
                let mut t = value.to_string();
                t.insert_str(pos, &s);
                (Some(t), pos + s.len())
            }
            TextEdit::Backspace => {
                if pos == 0 {
                    return None;
                }
                let prev = prev_grapheme_boundary(value, pos);
                let mut t = value.to_string();
                t.replace_range(prev..pos, "");
                (Some(t), prev)
            }
            TextEdit::Delete => {
                if pos >= value.len() {
                    return None;
                }
                let next = next_grapheme_boundary(value, pos);
                let mut t = value.to_string();
                t.replace_range(pos..next, "");
                (Some(t), pos)
            }
            TextEdit::Left => (None, prev_grapheme_boundary(value, pos)),
            TextEdit::Right => (None, next_grapheme_boundary(value, pos)),
            TextEdit::Home => (None, 0),
            TextEdit::End => (None, value.len()),
        };
        self.before_edit = next.as_ref().map(|_| (value.to_string(), pos));
        self.caret = caret;
        self.last_len = next.as_ref().map_or(value.len(), String::len);
        next
    }

    /// Re-anchors the caret after the value changed from outside. A caret
    /// that sat at the end stays at the end; otherwise it is clamped. A
    /// value that comes back unchanged from before the last edit (the edit
    /// was rejected) puts the caret back where it was.
    pub fn sync(&mut self, value: &str) {
        if let Some((prev, caret)) = self.before_edit.take()
            && prev == value
        {
            self.caret = caret;
            self.last_len = value.len();
            return;
        }
        if self.caret >= self.last_len {
            self.caret = value.len();
        } else {
            self.caret = snap_to_grapheme(value, self.caret.min(value.len()));
        }
        self.last_len = value.len();
    }
}

fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

fn snap_to_grapheme(text: &str, byte: usize) -> usize {
    if byte >= text.len() {
        return text.len();
    }
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            break;
        }
        last = i;
    }
    last
}

fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut j = i;
    while j > 0 && !s.is_char_boundary(j) {
        j -= 1;
    }
    j
}
