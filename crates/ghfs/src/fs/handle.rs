//! Streaming reads over base64-encoded file payloads
//!
//! The contents API ships a file as one base64 string. A [`FileHandle`]
//! decodes it lazily as the kernel reads, front to back. There is no seek:
//! once bytes are consumed, reading them again requires a new open.

use std::io::{self, Cursor, Read};

use base64::engine::{general_purpose, GeneralPurpose};
use base64::read::DecoderReader;

static ENGINE: GeneralPurpose = general_purpose::STANDARD;

/// Forward-only decoding cursor bound to one opened file
pub struct FileHandle {
    decoder: DecoderReader<'static, GeneralPurpose, Cursor<Vec<u8>>>,
    position: u64,
}

impl FileHandle {
    /// Seed a decoder from an encoded payload. GitHub wraps the payload
    /// every 60 characters; line breaks are dropped before decoding.
    pub fn new(encoded: &str) -> Self {
        let stripped: Vec<u8> = encoded
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        Self {
            decoder: DecoderReader::new(Cursor::new(stripped), &ENGINE),
            position: 0,
        }
    }

    /// Decode up to `size` bytes.
    ///
    /// The returned buffer is shorter than `size` only at end of stream; an
    /// empty buffer means the stream is exhausted. A malformed payload
    /// surfaces as an `InvalidData` error.
    pub fn read(&mut self, size: u32) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; size as usize];
        let mut filled = 0;

        while filled < buf.len() {
            match self.decoder.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        buf.truncate(filled);
        self.position += filled as u64;
        Ok(buf)
    }

    /// Number of decoded bytes handed out so far
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
