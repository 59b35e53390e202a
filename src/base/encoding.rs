//! Source encoding sniffing and round-tripping.
//!
//! Detection looks at the byte-order mark first and falls back to a UTF-8
//! validity check. The same detector must be applied to expected and actual
//! files for an encoding comparison to mean anything.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];
const UTF32_LE_BOM: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const UTF32_BE_BOM: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];

/// Text encoding of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8 without a byte-order mark.
    #[default]
    Utf8,
    /// UTF-8 with a leading `EF BB BF`.
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    /// Anything that is not valid UTF-8 and carries no BOM.
    Latin1,
}

impl Encoding {
    /// Sniff the encoding of raw file contents.
    pub fn sniff(bytes: &[u8]) -> Self {
        // UTF-32 LE shares its first two bytes with UTF-16 LE, so check it first.
        if bytes.starts_with(UTF32_LE_BOM) {
            Encoding::Utf32Le
        } else if bytes.starts_with(UTF32_BE_BOM) {
            Encoding::Utf32Be
        } else if bytes.starts_with(UTF8_BOM) {
            Encoding::Utf8Bom
        } else if bytes.starts_with(UTF16_LE_BOM) {
            Encoding::Utf16Le
        } else if bytes.starts_with(UTF16_BE_BOM) {
            Encoding::Utf16Be
        } else if std::str::from_utf8(bytes).is_ok() {
            Encoding::Utf8
        } else {
            Encoding::Latin1
        }
    }

    /// Byte-order mark written ahead of encoded text (empty when none).
    pub fn bom(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 | Encoding::Latin1 => &[],
            Encoding::Utf8Bom => UTF8_BOM,
            Encoding::Utf16Le => UTF16_LE_BOM,
            Encoding::Utf16Be => UTF16_BE_BOM,
            Encoding::Utf32Le => UTF32_LE_BOM,
            Encoding::Utf32Be => UTF32_BE_BOM,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Bom => "utf-8-bom",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Utf32Le => "utf-32le",
            Encoding::Utf32Be => "utf-32be",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Decode bytes in this encoding, dropping a matching BOM.
    ///
    /// Malformed sequences are replaced with U+FFFD rather than failing.
    pub fn decode(self, bytes: &[u8]) -> String {
        let body = bytes.strip_prefix(self.bom()).unwrap_or(bytes);
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => String::from_utf8_lossy(body).into_owned(),
            Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
            Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
            Encoding::Utf32Le => decode_utf32(body, u32::from_le_bytes),
            Encoding::Utf32Be => decode_utf32(body, u32::from_be_bytes),
            Encoding::Latin1 => body.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// Encode text in this encoding, including its BOM.
    ///
    /// Characters Latin-1 cannot represent are written as `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut out = self.bom().to_vec();
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => out.extend_from_slice(text.as_bytes()),
            Encoding::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes())),
            Encoding::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes())),
            Encoding::Utf32Le => text
                .chars()
                .for_each(|c| out.extend_from_slice(&u32::from(c).to_le_bytes())),
            Encoding::Utf32Be => text
                .chars()
                .for_each(|c| out.extend_from_slice(&u32::from(c).to_be_bytes())),
            Encoding::Latin1 => out.extend(
                text.chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
            ),
        }
        out
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_utf16(body: &[u8], read: fn([u8; 2]) -> u16) -> String {
    let units = body.chunks_exact(2).map(|pair| read([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn decode_utf32(body: &[u8], read: fn([u8; 4]) -> u32) -> String {
    body.chunks_exact(4)
        .map(|quad| {
            char::from_u32(read([quad[0], quad[1], quad[2], quad[3]]))
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect()
}

// ============================================================================
// DETECTION
// ============================================================================

/// Capability to determine the encoding of a file.
pub trait EncodingDetector: Send + Sync {
    /// Detect the encoding of in-memory file contents.
    fn detect_bytes(&self, bytes: &[u8]) -> Encoding;

    /// Detect the encoding of a file on disk.
    fn detect(&self, path: &Path) -> io::Result<Encoding> {
        let bytes = fs::read(path)?;
        Ok(self.detect_bytes(&bytes))
    }
}

/// Default detector: byte-order mark, then UTF-8 validity, then Latin-1.
#[derive(Debug, Clone, Copy, Default)]
pub struct BomDetector;

impl EncodingDetector for BomDetector {
    fn detect_bytes(&self, bytes: &[u8]) -> Encoding {
        Encoding::sniff(bytes)
    }
}

/// Detect a file's encoding with the default [`BomDetector`].
pub fn detect_encoding(path: &Path) -> io::Result<Encoding> {
    BomDetector.detect(path)
}

/// Read a file as text, returning the decoded contents and the detected encoding.
pub fn read_text(path: &Path, detector: &dyn EncodingDetector) -> io::Result<(String, Encoding)> {
    let bytes = fs::read(path)?;
    let encoding = detector.detect_bytes(&bytes);
    Ok((encoding.decode(&bytes), encoding))
}
