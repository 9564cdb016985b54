//! Bounded token stream per session
//!
//! Words flow in at the tail from the transcription producer and drain from
//! the head as the matcher consumes fully-scanned prefix. On overflow the
//! oldest words drop silently.

use std::collections::VecDeque;

/// Default word capacity per session
pub const DEFAULT_CAPACITY: usize = 500;

/// Ordered, bounded queue of lowercase words awaiting matching
#[derive(Debug)]
pub struct TokenBuffer {
    words: VecDeque<String>,
    capacity: usize,
}

impl TokenBuffer {
    /// Create an empty buffer holding at most `capacity` words
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push words at the tail, evicting from the head past capacity
    pub fn append<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.words.extend(words);
        while self.words.len() > self.capacity {
            self.words.pop_front();
        }
    }

    /// Materialize the current contents as one space-joined string
    #[must_use]
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Remove up to `count` words from the head
    ///
    /// Clamped to the current length: concurrent eviction may have already
    /// trimmed words the caller scanned.
    pub fn consume(&mut self, count: usize) {
        let count = count.min(self.words.len());
        self.words.drain(..count);
    }

    /// Number of buffered words
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no words are buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn append_and_snapshot_preserve_order() {
        let mut buf = TokenBuffer::new(10);
        buf.append(words(&["i", "love", "usa"]));
        assert_eq!(buf.snapshot(), "i love usa");
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn overflow_drops_oldest_words() {
        let mut buf = TokenBuffer::new(3);
        buf.append(words(&["a", "b", "c", "d"]));
        assert_eq!(buf.snapshot(), "b c d");
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn capacity_holds_across_repeated_appends() {
        let mut buf = TokenBuffer::new(3);
        for w in ["a", "b", "c", "d", "e"] {
            buf.append(words(&[w]));
            assert!(buf.len() <= 3);
        }
        assert_eq!(buf.snapshot(), "c d e");
    }

    #[test]
    fn consume_removes_prefix() {
        let mut buf = TokenBuffer::new(10);
        buf.append(words(&["one", "two", "three"]));
        buf.consume(2);
        assert_eq!(buf.snapshot(), "three");
    }

    #[test]
    fn consume_zero_is_a_noop() {
        let mut buf = TokenBuffer::new(10);
        buf.append(words(&["one"]));
        buf.consume(0);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn consume_clamps_past_length() {
        let mut buf = TokenBuffer::new(10);
        buf.append(words(&["one", "two"]));
        buf.consume(5);
        assert!(buf.is_empty());
        assert_eq!(buf.snapshot(), "");
    }
}
