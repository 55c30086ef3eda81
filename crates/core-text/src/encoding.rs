//! Text encoding detection and transcoding.
//!
//! Detection trial-decodes a leading chunk of the file against an ordered
//! candidate list and keeps the first encoding that accepts it. Latin-1 maps
//! every byte, so detection always settles by the third candidate; cp1252 is
//! reachable through an explicit `set_encoding`.
//!
//! A consequence: a cp1252 file using the 0x80..=0x9F range (`€`, curly
//! quotes) reloads as Latin-1 and those bytes come back as C1 control chars.
//! The bytes on disk survive another save unchanged; only the decoded text
//! differs.

/// Number of leading bytes inspected by [`Encoding::detect`].
pub const DETECT_CHUNK: usize = 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// UTF-8 with a leading byte order mark (stripped on load, re-emitted on save).
    Utf8Sig,
    Latin1,
    Cp1252,
}

/// Detection order.
pub const CANDIDATES: [Encoding; 4] = [
    Encoding::Utf8Sig,
    Encoding::Utf8,
    Encoding::Latin1,
    Encoding::Cp1252,
];

/// A character the target encoding cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unencodable {
    pub ch: char,
    pub encoding: Encoding,
}

impl std::fmt::Display for Unencodable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "character {:?} cannot be encoded as {}",
            self.ch,
            self.encoding.name()
        )
    }
}

impl std::error::Error for Unencodable {}

// cp1252 assignments for 0x80..=0x9F; `None` marks bytes the code page leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Sig => "utf-8-sig",
            Encoding::Latin1 => "latin-1",
            Encoding::Cp1252 => "cp1252",
        }
    }

    /// Resolve a user-supplied encoding name (case-insensitive, common aliases accepted).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Some(Encoding::Utf8Sig),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Some(Encoding::Latin1),
            "cp1252" | "windows-1252" => Some(Encoding::Cp1252),
            _ => None,
        }
    }

    /// Pick the first candidate that decodes the leading chunk of `bytes`
    /// without error, defaulting to UTF-8 (lossy) when none does.
    pub fn detect(bytes: &[u8]) -> Self {
        let chunk = &bytes[..bytes.len().min(DETECT_CHUNK)];
        CANDIDATES
            .into_iter()
            .find(|enc| enc.accepts(chunk))
            .unwrap_or_default()
    }

    fn accepts(self, chunk: &[u8]) -> bool {
        match self {
            Encoding::Utf8 => utf8_prefix_valid(chunk),
            Encoding::Utf8Sig => chunk
                .strip_prefix(UTF8_BOM)
                .is_some_and(utf8_prefix_valid),
            Encoding::Latin1 => true,
            Encoding::Cp1252 => chunk
                .iter()
                .all(|&b| !(0x80..=0x9F).contains(&b) || CP1252_HIGH[(b - 0x80) as usize].is_some()),
        }
    }

    /// Decode `bytes` in full. Invalid sequences become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Utf8Sig => {
                String::from_utf8_lossy(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)).into_owned()
            }
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Encoding::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize].unwrap_or('\u{FFFD}'),
                    _ => b as char,
                })
                .collect(),
        }
    }

    /// Encode `text` for writing.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, Unencodable> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Utf8Sig => {
                let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
                out.extend_from_slice(UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                Ok(out)
            }
            Encoding::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch)).map_err(|_| Unencodable { ch, encoding: self })
                })
                .collect(),
            Encoding::Cp1252 => text.chars().map(|ch| self.encode_cp1252(ch)).collect(),
        }
    }

    fn encode_cp1252(self, ch: char) -> Result<u8, Unencodable> {
        let code = u32::from(ch);
        if code < 0x80 || (0xA0..=0xFF).contains(&code) {
            return Ok(code as u8);
        }
        CP1252_HIGH
            .iter()
            .position(|c| *c == Some(ch))
            .map(|idx| 0x80 + idx as u8)
            .ok_or(Unencodable { ch, encoding: self })
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// UTF-8 validity where a multi-byte sequence cut off by the end of the
/// chunk still counts as valid.
fn utf8_prefix_valid(chunk: &[u8]) -> bool {
    match std::str::from_utf8(chunk) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_utf8() {
        assert_eq!(Encoding::detect("héllo".as_bytes()), Encoding::Utf8);
        assert_eq!(Encoding::detect(b""), Encoding::Utf8);
    }

    #[test]
    fn detects_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"abc");
        let enc = Encoding::detect(&bytes);
        assert_eq!(enc, Encoding::Utf8Sig);
        assert_eq!(enc.decode(&bytes), "abc");
        assert_eq!(enc.encode("abc").unwrap(), bytes);
    }

    #[test]
    fn falls_back_to_latin1() {
        let bytes = [b'c', b'a', b'f', 0xE9];
        // 0xE9 alone at end looks like a truncated sequence; put something after it.
        let mut padded = bytes.to_vec();
        padded.push(b'!');
        let enc = Encoding::detect(&padded);
        assert_eq!(enc, Encoding::Latin1);
        assert_eq!(enc.decode(&padded), "café!");
    }

    #[test]
    fn truncated_sequence_at_chunk_end_is_accepted() {
        let mut bytes = vec![b'a'; DETECT_CHUNK - 1];
        bytes.extend_from_slice("é".as_bytes()); // second byte lands past the chunk
        assert_eq!(Encoding::detect(&bytes), Encoding::Utf8);
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        let err = Encoding::Latin1.encode("a€").unwrap_err();
        assert_eq!(err.ch, '€');
    }

    #[test]
    fn cp1252_round_trips_euro() {
        let bytes = Encoding::Cp1252.encode("€5").unwrap();
        assert_eq!(bytes, vec![0x80, b'5']);
        assert_eq!(Encoding::Cp1252.decode(&bytes), "€5");
        assert!(!Encoding::Cp1252.accepts(&[0x81]));
    }

    #[test]
    fn names_resolve() {
        assert_eq!(Encoding::from_name("UTF8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_name("iso-8859-1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_name("windows_1252"), Some(Encoding::Cp1252));
        assert_eq!(Encoding::from_name("ebcdic"), None);
    }
}
