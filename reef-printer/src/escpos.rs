//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::codepage::CodepageMapping;

/// Text alignment (ESC a n)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// ESC/POS command builder
///
/// Accumulates commands and UTF-8 text; `build` converts the stream to the
/// target printer's codepage. Caller-supplied text is treated as data, never
/// as command syntax: control characters other than `\n` are dropped so a
/// crafted order or customer field cannot smuggle ESC/GS/FS sequences into
/// the byte stream.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(2048);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf, width }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Write sanitized text
    pub fn text(&mut self, s: &str) -> &mut Self {
        let mut utf8 = [0u8; 4];
        for c in s.chars() {
            if c == '\n' || !c.is_control() {
                self.buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write an empty line
    pub fn blank_line(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    /// Set text alignment
    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        let n = match alignment {
            Alignment::Left => 0x00,
            Alignment::Center => 0x01,
            Alignment::Right => 0x02,
        };
        self.buf.extend_from_slice(&[0x1B, 0x61, n]);
        self
    }

    /// Enable or disable bold text
    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, on as u8]);
        self
    }

    /// Full cut after feeding n lines (GS V 66 n)
    ///
    /// Lets the printer manage cutter-to-head distance, which wastes less
    /// top margin on the next ticket than separate feed and cut commands.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    /// Write raw bytes directly (commands only; bypasses sanitization)
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Build the final byte stream for the given codepage mapping
    pub fn build(self, codepage: CodepageMapping) -> Vec<u8> {
        codepage.convert_stream(&self.buf)
    }

    /// Build without codepage conversion (for debugging or ASCII-only content)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}
