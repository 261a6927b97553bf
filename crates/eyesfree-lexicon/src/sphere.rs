//! NIST SPHERE header for 16-bit linear PCM.
//!
//! The header is plain text, one `name -type value` field per line, closed by
//! `end_head` and padded with NUL bytes to exactly [`HEADER_SIZE`] bytes:
//!
//! ```text
//! NIST_1A
//!    1024
//! channel_count -i 1
//! sample_rate -i 22050
//! sample_n_bytes -i 2
//! sample_byte_format -s2 01
//! sample_count -i 26460
//! end_head
//! ```

use std::fmt::Write as _;

use crate::error::{LexiconError, LexiconResult};

/// Size of the encoded header in bytes.
pub const HEADER_SIZE: usize = 1024;

/// Bytes per sample of the raw stream.
pub const BYTES_PER_SAMPLE: u64 = 2;

/// Sample byte order as recorded in `sample_byte_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    fn code(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "01",
            ByteOrder::BigEndian => "10",
        }
    }
}

/// Fields of a SPHERE header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereHeader {
    pub channel_count: u32,
    pub sample_rate: u32,
    pub sample_n_bytes: u32,
    pub byte_order: ByteOrder,
    pub sample_count: u64,
}

impl SphereHeader {
    /// Mono, 16-bit, little-endian.
    pub fn pcm16_mono(sample_rate: u32, sample_count: u64) -> Self {
        Self {
            channel_count: 1,
            sample_rate,
            sample_n_bytes: BYTES_PER_SAMPLE as u32,
            byte_order: ByteOrder::LittleEndian,
            sample_count,
        }
    }

    /// The header text, without padding.
    pub fn text(&self) -> String {
        let mut text = String::new();
        // Writing to a String cannot fail.
        let _ = write!(
            text,
            "NIST_1A\n{:>7}\n\
             channel_count -i {}\n\
             sample_rate -i {}\n\
             sample_n_bytes -i {}\n\
             sample_byte_format -s2 {}\n\
             sample_count -i {}\n\
             end_head\n",
            HEADER_SIZE,
            self.channel_count,
            self.sample_rate,
            self.sample_n_bytes,
            self.byte_order.code(),
            self.sample_count,
        );
        text
    }

    /// Encodes the header, NUL-padded to exactly [`HEADER_SIZE`] bytes.
    pub fn encode(&self) -> LexiconResult<Vec<u8>> {
        let mut bytes = self.text().into_bytes();
        if bytes.len() > HEADER_SIZE {
            return Err(LexiconError::HeaderOverflow { len: bytes.len() });
        }
        bytes.resize(HEADER_SIZE, 0);
        Ok(bytes)
    }
}

/// Number of samples in a raw stream of `byte_len` bytes.
pub fn sample_count(byte_len: u64) -> u64 {
    byte_len / BYTES_PER_SAMPLE
}

/// A block of `samples` zero-valued samples.
pub fn silence(samples: u64) -> Vec<u8> {
    vec![0u8; (samples * BYTES_PER_SAMPLE) as usize]
}

/// Reads `sample_count` back out of an encoded header.
pub fn parse_sample_count(header: &[u8]) -> Option<u64> {
    let text = std::str::from_utf8(header.get(..HEADER_SIZE)?).ok()?;
    text.lines()
        .find_map(|line| line.strip_prefix("sample_count -i "))
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_text() {
        let header = SphereHeader::pcm16_mono(22050, 26460);
        assert_eq!(
            header.text(),
            "NIST_1A\n   1024\nchannel_count -i 1\nsample_rate -i 22050\n\
             sample_n_bytes -i 2\nsample_byte_format -s2 01\nsample_count -i 26460\nend_head\n"
        );
    }

    #[test]
    fn test_header_is_exactly_1024_bytes() {
        for count in [0, 1, 4410, 22050 * 60, u32::MAX as u64, u64::MAX] {
            let bytes = SphereHeader::pcm16_mono(22050, count).encode().unwrap();
            assert_eq!(bytes.len(), HEADER_SIZE);
        }
    }

    #[test]
    fn test_header_padding_is_nul() {
        let header = SphereHeader::pcm16_mono(22050, 100);
        let text_len = header.text().len();
        let bytes = header.encode().unwrap();
        assert!(bytes[text_len..].iter().all(|&b| b == 0));
        assert!(bytes[..text_len].iter().all(|&b| b != 0));
    }

    #[test]
    fn test_big_endian_code() {
        let header = SphereHeader {
            byte_order: ByteOrder::BigEndian,
            ..SphereHeader::pcm16_mono(8000, 1)
        };
        assert!(header.text().contains("sample_byte_format -s2 10\n"));
    }

    #[test]
    fn test_parse_sample_count() {
        let bytes = SphereHeader::pcm16_mono(22050, 12345).encode().unwrap();
        assert_eq!(parse_sample_count(&bytes), Some(12345));
        assert_eq!(parse_sample_count(b"short"), None);
    }

    #[test]
    fn test_sample_count_and_silence() {
        assert_eq!(sample_count(0), 0);
        assert_eq!(sample_count(44100), 22050);
        assert_eq!(sample_count(7), 3);

        let pad = silence(4410);
        assert_eq!(pad.len(), 8820);
        assert!(pad.iter().all(|&b| b == 0));
    }
}
