//! Bounded cursor over the caller's buffer.
//!
//! The cursor is a borrowed slice plus a position; it never owns bytes and
//! slices handed out keep the buffer's lifetime, so everything downstream
//! stays zero-copy. The position only moves forward within one parse call.

/// Forward-only view over a parse buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'b> {
    buf: &'b [u8],
    pos: usize,
}

impl<'b> Cursor<'b> {
    #[inline]
    pub(crate) fn new(buf: &'b [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left in front of the cursor.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub(crate) fn has(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Current byte, or `None` at end of buffer. This is the only
    /// end-of-buffer probe the line-end machine uses.
    #[inline]
    pub(crate) fn next_byte(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Unseen remainder of the buffer.
    #[inline]
    pub(crate) fn tail(&self) -> &'b [u8] {
        &self.buf[self.pos..]
    }

    /// Four bytes at the cursor as a little-endian packed word.
    /// Caller must have checked `has(4)`.
    #[inline]
    pub(crate) fn load_u32(&self) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        u32::from_le_bytes(word)
    }

    /// Eight bytes at the cursor as a little-endian packed word.
    /// Caller must have checked `has(8)`.
    #[inline]
    pub(crate) fn load_u64(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.buf[self.pos..self.pos + 8]);
        u64::from_le_bytes(word)
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(self.has(n));
        self.pos += n;
    }

    /// Slice of the underlying buffer between two previously observed
    /// positions. The result borrows from the buffer, not the cursor.
    #[inline]
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'b [u8] {
        &self.buf[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_remaining() {
        let mut cur = Cursor::new(b"abcdef");
        assert_eq!(cur.remaining(), 6);
        assert!(cur.has(6));
        assert!(!cur.has(7));
        cur.advance(4);
        assert_eq!(cur.pos(), 4);
        assert_eq!(cur.remaining(), 2);
        assert_eq!(cur.next_byte(), Some(b'e'));
        cur.advance(2);
        assert_eq!(cur.next_byte(), None);
    }

    #[test]
    fn packed_loads_are_little_endian() {
        let cur = Cursor::new(b"GET /abc");
        assert_eq!(cur.load_u32(), u32::from_le_bytes(*b"GET "));
        assert_eq!(cur.load_u64(), u64::from_le_bytes(*b"GET /abc"));
    }

    #[test]
    fn slices_outlive_the_cursor() {
        let buf = b"one two".to_vec();
        let piece = {
            let mut cur = Cursor::new(&buf);
            cur.advance(4);
            cur.slice(0, 3)
        };
        assert_eq!(piece, b"one");
    }
}
