//! BLAKE2b-512 digests used for the transcript hash chain.

use crate::{FormatError, Result};

use blake2::{Blake2b, Digest};
use std::{
    fmt::Write as _,
    io::{self, Read, Write},
};

/// Size in bytes of a transcript digest.
pub const HASH_SIZE: usize = 64;

pub type Hash = [u8; HASH_SIZE];

/// Streaming hasher. Bytes written through it are both hashed and forwarded
/// to the inner writer.
pub struct HashWriter<W: Write> {
    writer: W,
    hasher: Blake2b,
}

impl HashWriter<io::Sink> {
    /// A hasher which discards the bytes after hashing them.
    pub fn sink() -> Self {
        HashWriter::new(io::sink())
    }
}

impl<W: Write> HashWriter<W> {
    pub fn new(writer: W) -> Self {
        HashWriter {
            writer,
            hasher: Blake2b::new(),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Consumes the writer and returns the digest of everything written so far.
    pub fn into_hash(self) -> Hash {
        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(self.hasher.finalize().as_slice());
        hash
    }
}

impl<W: Write> Write for HashWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bytes = self.writer.write(buf)?;
        if bytes > 0 {
            self.hasher.update(&buf[0..bytes]);
        }
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Calculates the BLAKE2b-512 digest of the input.
pub fn calculate_hash(input: &[u8]) -> Hash {
    let mut hasher = HashWriter::sink();
    hasher.update(input);
    hasher.into_hash()
}

/// The all-zero digest.
pub fn blank_hash() -> Hash {
    [0u8; HASH_SIZE]
}

pub fn read_hash<R: Read>(mut reader: R) -> Result<Hash> {
    let mut hash = blank_hash();
    reader.read_exact(&mut hash)?;
    Ok(hash)
}

/// Formats a digest as 16 groups of 4 bytes, 4 groups per line.
pub fn hash_to_text(hash: &Hash) -> String {
    let mut text = String::with_capacity(HASH_SIZE * 2 + HASH_SIZE / 4);
    for (i, word) in hash.chunks(4).enumerate() {
        text.push_str(&hex::encode(word));
        text.push(if i % 4 == 3 { '\n' } else { ' ' });
    }
    text
}

/// Parses the text form produced by `hash_to_text`. Whitespace is ignored.
pub fn hash_from_text(text: &str) -> Result<Hash> {
    let digits = text.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    if digits.len() != HASH_SIZE * 2 {
        return Err(FormatError::InvalidHashText.into());
    }
    let bytes = hex::decode(&digits).map_err(|_| FormatError::InvalidHashText)?;
    let mut hash = blank_hash();
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

pub fn write_hash_text<W: Write>(mut writer: W, hash: &Hash) -> Result<()> {
    writer.write_all(hash_to_text(hash).as_bytes())?;
    Ok(())
}

pub fn read_hash_text<R: Read>(mut reader: R) -> Result<Hash> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|_| FormatError::InvalidHashText)?;
    hash_from_text(&text)
}

/// Logs a digest in its text form, one line per 16 bytes.
pub fn log_hash(hash: &Hash) {
    let mut output = String::new();
    for line in hash_to_text(hash).lines() {
        let _ = writeln!(output, "\t{}", line);
    }
    tracing::info!("\n{}", output);
}
