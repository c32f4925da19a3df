//! Codepage conversion for thermal printers
//!
//! A thermal printer renders bytes through whatever character table it is
//! configured with, so the byte stream has to be produced for that table.
//! The builder accumulates UTF-8 and converts once at build time; this
//! module owns that conversion plus byte-width helpers for column layout
//! (CJK characters occupy two columns in GBK).

use tracing::instrument;

/// Character-set mapping of the target printer.
///
/// `Epson` covers the common western ESC/POS table and is encoded here as
/// Windows-1252 (a superset of the printable range of that table). `Gbk` is
/// for CJK printers running in Chinese mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodepageMapping {
    #[default]
    Epson,
    Gbk,
}

impl CodepageMapping {
    /// Parse a descriptor label. Unknown labels fall back to `Epson`.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "gbk" => Self::Gbk,
            _ => Self::Epson,
        }
    }

    fn encoding(&self) -> &'static encoding_rs::Encoding {
        match self {
            Self::Epson => encoding_rs::WINDOWS_1252,
            Self::Gbk => encoding_rs::GBK,
        }
    }

    /// Encoded byte width of a string in this codepage.
    pub fn width(&self, s: &str) -> usize {
        let (bytes, _, _) = self.encoding().encode(s);
        bytes.len()
    }

    /// Truncate a string to fit within `max_width` encoded bytes.
    pub fn truncate(&self, s: &str, max_width: usize) -> String {
        let mut width = 0;
        let mut result = String::new();
        let mut buf = [0u8; 4];
        for c in s.chars() {
            let char_width = self.width(c.encode_utf8(&mut buf));
            if width + char_width > max_width {
                break;
            }
            result.push(c);
            width += char_width;
        }
        result
    }

    /// Pad a string to exactly `width` encoded bytes.
    ///
    /// Strings wider than `width` are truncated.
    pub fn pad(&self, s: &str, width: usize, align_right: bool) -> String {
        let current = self.width(s);
        if current >= width {
            return self.truncate(s, width);
        }
        let spaces = " ".repeat(width - current);
        if align_right {
            format!("{}{}", spaces, s)
        } else {
            format!("{}{}", s, spaces)
        }
    }

    /// Convert an accumulated UTF-8 command stream to printer bytes.
    ///
    /// Bytes below 0x80 are ESC/POS commands or ASCII text and pass through
    /// unchanged; only multi-byte UTF-8 runs are re-encoded. GBK output is
    /// bracketed with FS & / FS . so the printer enters and leaves Chinese
    /// mode, and Chinese mode is re-enabled after any ESC @ reset.
    #[instrument(skip(bytes))]
    pub fn convert_stream(&self, bytes: &[u8]) -> Vec<u8> {
        let encoding = self.encoding();
        let mut out = Vec::with_capacity(bytes.len() + 16);

        if *self == Self::Gbk {
            // FS & + FS C 1: enter Chinese mode, select the GBK table
            out.extend_from_slice(&[0x1C, 0x26, 0x1C, 0x43, 0x01]);
        }

        let mut pending: Vec<u8> = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];

            if *self == Self::Gbk && b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
                // ESC @ resets the printer and drops Chinese mode
                flush(encoding, &mut pending, &mut out);
                out.extend_from_slice(&[0x1B, 0x40, 0x1C, 0x26]);
                i += 2;
                continue;
            }

            if b < 0x80 {
                flush(encoding, &mut pending, &mut out);
                out.push(b);
            } else {
                pending.push(b);
            }
            i += 1;
        }
        flush(encoding, &mut pending, &mut out);

        if *self == Self::Gbk {
            // FS .: leave Chinese mode
            out.extend_from_slice(&[0x1C, 0x2E]);
        }

        out
    }
}

/// Flush a pending run of non-ASCII bytes through the codepage encoder.
fn flush(encoding: &'static encoding_rs::Encoding, pending: &mut Vec<u8>, out: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }
    let s = String::from_utf8_lossy(pending);
    let (encoded, _, _) = encoding.encode(&s);
    out.extend_from_slice(&encoded);
    pending.clear();
}
