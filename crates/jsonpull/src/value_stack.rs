//! The shared value arena.
//!
//! One growable byte stack per tokenizer holds the payload of the scalar
//! currently being scanned. On completion the payload is sealed with a
//! kind tag and stays addressable — a single-slot "last completed value"
//! cache — until the next pull invalidates it. Keeping one arena for every
//! pending parse avoids per-value heap allocations during scanning; the
//! accessors hand out borrowed views into it instead of owned strings.

use bstr::{BStr, ByteSlice};

/// Classification tag for a completed scalar payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarKind {
    String,
    Uint,
    Int,
    Double,
    Boolean,
    Null,
}

/// What the arena currently holds. This is the O(1) "top value and its
/// kind" query: the tag lives beside the bytes instead of being re-derived
/// from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Record {
    None,
    Name,
    Scalar(ScalarKind),
}

const INITIAL_CAPACITY: usize = 4096;

#[derive(Debug)]
pub(crate) struct ValueStack {
    buf: Vec<u8>,
    record: Record,
}

impl ValueStack {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            record: Record::None,
        }
    }

    /// Discards the previous payload and starts accumulating a new one.
    pub fn begin(&mut self) {
        self.buf.clear();
        self.record = Record::None;
    }

    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Seals the accumulated payload as the completed record.
    pub fn finish(&mut self, record: Record) {
        self.record = record;
    }

    /// Invalidates the completed record; the arena keeps its capacity.
    pub fn invalidate(&mut self) {
        self.record = Record::None;
    }

    pub fn record(&self) -> Record {
        self.record
    }

    /// The completed payload as a byte string. May hold WTF-8 when the
    /// input spelled lone surrogates with `\u` escapes.
    pub fn payload(&self) -> &BStr {
        self.buf.as_bstr()
    }

    pub fn payload_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, ScalarKind, ValueStack};

    #[test]
    fn begin_discards_previous_payload() {
        let mut stack = ValueStack::new();
        stack.begin();
        stack.push_bytes(b"first");
        stack.finish(Record::Scalar(ScalarKind::String));
        stack.begin();
        stack.push(b'x');
        stack.finish(Record::Name);
        assert_eq!(stack.record(), Record::Name);
        assert_eq!(stack.payload_bytes(), b"x");
    }

    #[test]
    fn invalidate_keeps_capacity() {
        let mut stack = ValueStack::new();
        let capacity = stack.buf.capacity();
        stack.begin();
        stack.push_bytes(b"payload");
        stack.finish(Record::Scalar(ScalarKind::Uint));
        stack.invalidate();
        assert_eq!(stack.record(), Record::None);
        assert!(stack.buf.capacity() >= capacity);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut stack = ValueStack::new();
        stack.begin();
        for _ in 0..10_000 {
            stack.push(b'a');
        }
        stack.finish(Record::Scalar(ScalarKind::String));
        assert_eq!(stack.payload_bytes().len(), 10_000);
    }
}
