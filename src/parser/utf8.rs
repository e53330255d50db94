//! Streaming UTF-8 decoding for the parser
//!
//! Bytes arrive in arbitrary chunks, so a character may be split across
//! calls. The decoder keeps the partial sequence between feeds.

/// Replacement for bytes that do not form a valid character
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Incremental decoder building the code point as bytes arrive
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder {
    /// Code point bits gathered so far
    code: u32,
    /// Continuation bytes still expected
    remaining: u8,
    /// Smallest code point the lead byte may encode; below it is overlong
    floor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utf8Result {
    Pending,
    Char(char),
    Invalid,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True while a multi-byte sequence is incomplete
    pub fn is_pending(&self) -> bool {
        self.remaining > 0
    }

    pub fn feed(&mut self, byte: u8) -> Utf8Result {
        if self.remaining == 0 {
            let (bits, remaining, floor) = match byte {
                0x00..=0x7F => return Utf8Result::Char(char::from(byte)),
                0xC2..=0xDF => (byte & 0x1F, 1, 0x80),
                0xE0..=0xEF => (byte & 0x0F, 2, 0x800),
                0xF0..=0xF4 => (byte & 0x07, 3, 0x1_0000),
                // Stray continuation bytes, C0/C1 and F5..FF never start a character
                _ => return Utf8Result::Invalid,
            };
            *self = Self {
                code: u32::from(bits),
                remaining,
                floor,
            };
            return Utf8Result::Pending;
        }

        if byte & 0xC0 != 0x80 {
            self.reset();
            return Utf8Result::Invalid;
        }

        self.code = (self.code << 6) | u32::from(byte & 0x3F);
        self.remaining -= 1;
        if self.remaining > 0 {
            return Utf8Result::Pending;
        }

        let (code, floor) = (self.code, self.floor);
        self.reset();
        // from_u32 rejects surrogates and anything past U+10FFFF
        match char::from_u32(code) {
            Some(c) if code >= floor => Utf8Result::Char(c),
            _ => Utf8Result::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.feed(b'A'), Utf8Result::Char('A'));
        assert_eq!(decoder.feed(b'0'), Utf8Result::Char('0'));
    }

    #[test]
    fn test_two_byte() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.feed(0xC3), Utf8Result::Pending);
        assert_eq!(decoder.feed(0xA9), Utf8Result::Char('é'));
    }

    #[test]
    fn test_three_byte() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.feed(0xE4), Utf8Result::Pending);
        assert_eq!(decoder.feed(0xB8), Utf8Result::Pending);
        assert_eq!(decoder.feed(0xAD), Utf8Result::Char('中'));
    }

    #[test]
    fn test_four_byte() {
        let mut decoder = Utf8Decoder::new();
        for &byte in &[0xF0, 0x9F, 0x98] {
            assert_eq!(decoder.feed(byte), Utf8Result::Pending);
        }
        assert_eq!(decoder.feed(0x80), Utf8Result::Char('😀'));
    }

    #[test]
    fn test_invalid_start() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.feed(0xFF), Utf8Result::Invalid);
        assert_eq!(decoder.feed(0x80), Utf8Result::Invalid);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_invalid_continuation() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.feed(0xC3), Utf8Result::Pending);
        assert_eq!(decoder.feed(b'a'), Utf8Result::Invalid);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_overlong_and_out_of_range_rejected() {
        let mut decoder = Utf8Decoder::new();
        for &byte in &[0xE0, 0x80] {
            assert_eq!(decoder.feed(byte), Utf8Result::Pending);
        }
        assert_eq!(decoder.feed(0x80), Utf8Result::Invalid);

        for &byte in &[0xF4, 0x90, 0x80] {
            assert_eq!(decoder.feed(byte), Utf8Result::Pending);
        }
        assert_eq!(decoder.feed(0x80), Utf8Result::Invalid);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_surrogate_rejected() {
        let mut decoder = Utf8Decoder::new();
        decoder.feed(0xED);
        decoder.feed(0xA0);
        assert_eq!(decoder.feed(0x80), Utf8Result::Invalid);
    }
}
