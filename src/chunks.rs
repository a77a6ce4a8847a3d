use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{ErrorPosition, WavCodecError, WavCodecResult};

/// FourCC chunk identifier wrapper -- does not own the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkId {
    pub id: [u8; 4],
}

impl AsRef<[u8]> for ChunkId {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.id
    }
}

impl Display for ChunkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match core::str::from_utf8(&self.id) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(
                f,
                "0x{:02X}{:02X}{:02X}{:02X}",
                self.id[0], self.id[1], self.id[2], self.id[3]
            ),
        }
    }
}

impl From<&[u8; 4]> for ChunkId {
    fn from(value: &[u8; 4]) -> Self {
        ChunkId { id: *value }
    }
}

impl ChunkId {
    #[inline]
    pub const fn new(id: &[u8; 4]) -> Self {
        ChunkId { id: *id }
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.id
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.id).ok()
    }
}

pub const RIFF_CHUNK: ChunkId = ChunkId::new(b"RIFF");
pub const WAVE_CHUNK: ChunkId = ChunkId::new(b"WAVE");
pub const FMT_CHUNK: ChunkId = ChunkId::new(b"fmt ");
pub const DATA_CHUNK: ChunkId = ChunkId::new(b"data");

/// Bounds-checked little-endian reader over a byte buffer.
///
/// Every read either yields a value and advances the position or fails
/// with an [`ErrorPosition`] at the short read. Chunk-size arithmetic is
/// checked, so a hostile size field cannot wrap the cursor around.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        ByteCursor { bytes, pos: 0 }
    }

    /// Current byte offset from the start of the buffer
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left before the logical end
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// True while at least one full chunk header (id + size) is readable
    #[inline]
    pub const fn has_chunk_header(&self) -> bool {
        self.remaining() >= 8
    }

    fn take(&mut self, len: usize, what: &str) -> WavCodecResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or_else(|| {
            WavCodecError::invalid_container(
                "Cursor position overflow",
                format!("reading {} bytes for {}", len, what),
                ErrorPosition::new(self.pos),
            )
        })?;
        if end > self.bytes.len() {
            return Err(WavCodecError::invalid_container(
                "Buffer too short",
                format!(
                    "need {} bytes for {}, only {} remain",
                    len,
                    what,
                    self.remaining()
                ),
                ErrorPosition::new(self.pos).with_description(format!("{} field", what)),
            ));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn u16_le(&mut self, what: &str) -> WavCodecResult<u16> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self, what: &str) -> WavCodecResult<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a FourCC tag
    pub fn chunk_id(&mut self, what: &str) -> WavCodecResult<ChunkId> {
        let b = self.take(4, what)?;
        let id: &[u8; 4] = b.try_into().expect("take(4) yields exactly 4 bytes");
        Ok(ChunkId::new(id))
    }

    /// Jump to an absolute offset, clamped to the buffer end.
    ///
    /// Clamping (rather than erroring) lets the chunk walk terminate
    /// cleanly when a trailing chunk declares more bytes than exist.
    #[inline]
    pub fn seek_to(&mut self, offset: usize) {
        self.pos = offset.min(self.bytes.len());
    }

    /// Borrow everything from the current position to the buffer end
    /// without advancing
    pub fn peek_rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}
