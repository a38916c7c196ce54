use std::fmt;

/// Fixed header preceding the first chunk record of a PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Length of the fixed header skipped before the first record.
pub const HEADER_LEN: usize = 8;

/// Bytes of framing around a record payload: length, tag and trailer.
pub const RECORD_OVERHEAD: usize = 12;

/// Four-byte type identifier of a chunk record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl PartialEq<str> for ChunkTag {
    fn eq(&self, other: &str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for ChunkTag {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl From<[u8; 4]> for ChunkTag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl serde::Serialize for ChunkTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// List the type tags of every record in a length-prefixed chunk container.
///
/// The blob is an 8-byte header followed by records laid out as a 4-byte
/// big-endian payload length `L`, a 4-byte tag, `L` payload bytes and a
/// 4-byte trailer. Tags are returned in byte order. Neither lengths nor
/// trailers are validated.
///
/// # Panics
///
/// The container must be well formed. A record whose length or tag field
/// extends past the end of `blob` causes an out-of-range slice.
pub fn list_chunks(blob: &[u8]) -> Vec<ChunkTag> {
    let mut tags = Vec::new();
    let mut offset = HEADER_LEN;

    while offset < blob.len() {
        let len = u32::from_be_bytes(read_word(blob, offset)) as usize;
        tags.push(ChunkTag(read_word(blob, offset + 4)));
        offset += len + RECORD_OVERHEAD;
    }

    tracing::trace!(count = tags.len(), "Chunk walk finished");
    tags
}

fn read_word(blob: &[u8], at: usize) -> [u8; 4] {
    let mut word = [0u8; 4];
    word.copy_from_slice(&blob[at..at + 4]);
    word
}
