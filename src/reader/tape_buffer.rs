/// The characters loaded into the reader and how far it has read into them.
///
/// Consumed characters are dropped on the next `append`, so `cursor` is
/// relative to what is still held. `position` counts every character read
/// since the last `clear` and never decreases.
#[derive(Debug, Default)]
pub struct TapeBuffer {
    content: Vec<char>,
    cursor: usize,
    base: usize,
}

/// The delimiter inserted between two loads when the first one ended mid-line.
const SYNTHETIC_DELIMITER: char = '\n';

fn is_delimiter(c: char) -> bool {
    c == '\r' || c == '\n'
}

impl TapeBuffer {
    pub fn new() -> TapeBuffer {
        TapeBuffer::default()
    }

    /// Add `text` after the unread content.
    ///
    /// If everything loaded so far has been read and it did not end with a
    /// line delimiter, a delimiter is inserted first so the last word of the
    /// old load is not continued by the new one.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let ended_mid_line = self
            .content
            .last()
            .map_or(false, |&last| !is_delimiter(last));
        let needs_delimiter = self.remaining() == 0 && ended_mid_line;

        self.compact();
        if needs_delimiter {
            self.content.push(SYNTHETIC_DELIMITER);
        }
        self.content.extend(text.chars());
    }

    /// Drop all content and rewind.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.base = 0;
    }

    /// The character under the read head, if any.
    pub fn peek(&self) -> Option<char> {
        self.content.get(self.cursor).copied()
    }

    /// Move the read head forward. Callers check `remaining` first.
    pub fn advance(&mut self, count: usize) {
        debug_assert!(count <= self.remaining(), "advanced past the end of the tape");
        self.cursor += count;
    }

    /// Unread content, for the decoder.
    pub fn unread(&self) -> &[char] {
        &self.content[self.cursor..]
    }

    pub fn remaining(&self) -> usize {
        self.content.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of characters read since the last `clear`.
    pub fn position(&self) -> usize {
        self.base + self.cursor
    }

    // Keep the last consumed character, the delimiter check needs it.
    fn compact(&mut self) {
        let drop = self.cursor.saturating_sub(1);
        if drop > 0 {
            let _ = self.content.drain(..drop);
            self.base += drop;
            self.cursor -= drop;
        }
    }
}
