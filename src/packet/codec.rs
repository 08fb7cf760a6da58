use super::Encoding;
use bytes::{Buf, BufMut, BytesMut};

/// Growable binary packet buffer with sequential typed writes and
/// cursor-advancing typed reads.
///
/// Writes always append at the end of the buffer; reads always consume from
/// the read cursor forward, so `unread_len()` is the number of bytes still
/// available to read. A packet is built by a sequence of typed writes and
/// either serialized with [`to_bytes`](Packet::to_bytes) for transmission,
/// or filled from a received datagram with
/// [`from_bytes`](Packet::from_bytes) and drained by typed reads.
///
/// All multi-byte values use little-endian byte order on the wire.
///
/// # Examples
///
/// ```
/// use relaynet::Packet;
///
/// let mut packet = Packet::new();
/// packet.write_i32(42);
/// packet.write_string("hi");
///
/// let mut received = Packet::from_bytes(&packet.to_bytes());
/// assert_eq!(received.read_i32(), 42);
/// assert_eq!(received.read_string(), "hi");
/// ```
///
/// Checked reads recover from truncated input instead of panicking:
///
/// ```
/// use relaynet::Packet;
///
/// let mut packet = Packet::from_bytes(&[0x01, 0x02]);
/// assert_eq!(packet.try_read_i32(), None);
/// assert_eq!(packet.try_read_i16(), Some(0x0201));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Packet {
    buf: BytesMut,
    cursor: usize,
}

impl Packet {
    /// Creates an empty packet.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            cursor: 0,
        }
    }

    /// Creates a packet pre-filled with the payload of a received datagram,
    /// with the read cursor at the start.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut packet = Self::new();
        packet.write_bytes(data);
        packet
    }

    /// Total number of bytes in the buffer, read and unread.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when the buffer holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes between the read cursor and the end of the buffer.
    pub fn unread_len(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// Resets the buffer to empty and the cursor to the start so the packet
    /// can be reused for the next message.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    /// Snapshot of the full buffer for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.to_vec()
    }

    /// Borrowed view of the full buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    // --- writes (append-only, infallible) ---

    /// Appends raw bytes without any framing; the caller manages their
    /// length externally.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16_le(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    /// Appends a string as a 4-byte little-endian byte count followed by one
    /// byte per character in the default [`Encoding::Ascii`] table.
    pub fn write_string(&mut self, value: &str) {
        self.write_string_with(value, Encoding::default());
    }

    /// Appends a string using the given character table.
    pub fn write_string_with(&mut self, value: &str, encoding: Encoding) {
        let encoded = encoding.encode(value);
        self.write_i32(encoded.len() as i32);
        self.buf.put_slice(&encoded);
    }

    /// Appends a 4-byte little-endian element count followed by the
    /// back-to-back encodings of each element, with no per-element tags.
    pub fn write_i16_array(&mut self, values: &[i16]) {
        self.write_i32(values.len() as i32);
        for &value in values {
            self.write_i16(value);
        }
    }

    pub fn write_i32_array(&mut self, values: &[i32]) {
        self.write_i32(values.len() as i32);
        for &value in values {
            self.write_i32(value);
        }
    }

    pub fn write_i64_array(&mut self, values: &[i64]) {
        self.write_i32(values.len() as i32);
        for &value in values {
            self.write_i64(value);
        }
    }

    pub fn write_f32_array(&mut self, values: &[f32]) {
        self.write_i32(values.len() as i32);
        for &value in values {
            self.write_f32(value);
        }
    }

    pub fn write_string_array<S: AsRef<str>>(&mut self, values: &[S]) {
        self.write_string_array_with(values, Encoding::default());
    }

    pub fn write_string_array_with<S: AsRef<str>>(&mut self, values: &[S], encoding: Encoding) {
        self.write_i32(values.len() as i32);
        for value in values {
            self.write_string_with(value.as_ref(), encoding);
        }
    }

    // --- unchecked reads ---
    //
    // Reading past the end of the buffer through these is a programming
    // error, like indexing a slice out of bounds. Use the try_read variants
    // for input that may be truncated.

    /// Consumes the cursor by `width` bytes and returns them.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `width` bytes remain unread.
    fn take(&mut self, width: usize) -> &[u8] {
        assert!(
            width <= self.unread_len(),
            "read of {width} bytes out of range ({} unread)",
            self.unread_len()
        );
        let start = self.cursor;
        self.cursor += width;
        &self.buf[start..start + width]
    }

    /// Reads `length` raw bytes from the cursor forward.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `length` bytes remain unread.
    pub fn read_bytes(&mut self, length: usize) -> Vec<u8> {
        self.take(length).to_vec()
    }

    /// # Panics
    ///
    /// Panics if fewer than 2 bytes remain unread.
    pub fn read_i16(&mut self) -> i16 {
        let mut bytes = self.take(2);
        bytes.get_i16_le()
    }

    /// # Panics
    ///
    /// Panics if fewer than 4 bytes remain unread.
    pub fn read_i32(&mut self) -> i32 {
        let mut bytes = self.take(4);
        bytes.get_i32_le()
    }

    /// # Panics
    ///
    /// Panics if fewer than 8 bytes remain unread.
    pub fn read_i64(&mut self) -> i64 {
        let mut bytes = self.take(8);
        bytes.get_i64_le()
    }

    /// # Panics
    ///
    /// Panics if fewer than 4 bytes remain unread.
    pub fn read_f32(&mut self) -> f32 {
        let mut bytes = self.take(4);
        bytes.get_f32_le()
    }

    /// Reads a length-prefixed string in the default [`Encoding::Ascii`]
    /// table.
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not hold a complete string field.
    pub fn read_string(&mut self) -> String {
        self.read_string_with(Encoding::default())
    }

    /// Reads a length-prefixed string using the given character table.
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not hold a complete string field.
    pub fn read_string_with(&mut self, encoding: Encoding) -> String {
        let length = self.read_i32();
        assert!(length >= 0, "negative string length prefix ({length})");
        let bytes = self.read_bytes(length as usize);
        encoding.decode(&bytes)
    }

    // --- checked reads ---
    //
    // Each returns None when the unread bytes cannot satisfy the field,
    // leaving the cursor where it was before the call. A length prefix that
    // cannot itself be read, or a negative one, is an overall failure.

    pub fn try_read_bytes(&mut self, length: usize) -> Option<Vec<u8>> {
        if length > self.unread_len() {
            return None;
        }
        Some(self.read_bytes(length))
    }

    pub fn try_read_i16(&mut self) -> Option<i16> {
        if self.unread_len() < 2 {
            return None;
        }
        Some(self.read_i16())
    }

    pub fn try_read_i32(&mut self) -> Option<i32> {
        if self.unread_len() < 4 {
            return None;
        }
        Some(self.read_i32())
    }

    pub fn try_read_i64(&mut self) -> Option<i64> {
        if self.unread_len() < 8 {
            return None;
        }
        Some(self.read_i64())
    }

    pub fn try_read_f32(&mut self) -> Option<f32> {
        if self.unread_len() < 4 {
            return None;
        }
        Some(self.read_f32())
    }

    pub fn try_read_string(&mut self) -> Option<String> {
        self.try_read_string_with(Encoding::default())
    }

    pub fn try_read_string_with(&mut self, encoding: Encoding) -> Option<String> {
        self.restoring(|packet| {
            let length = usize::try_from(packet.try_read_i32()?).ok()?;
            let bytes = packet.try_read_bytes(length)?;
            Some(encoding.decode(&bytes))
        })
    }

    pub fn try_read_i16_array(&mut self) -> Option<Vec<i16>> {
        self.restoring(|packet| {
            let count = packet.try_read_count()?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(packet.try_read_i16()?);
            }
            Some(values)
        })
    }

    pub fn try_read_i32_array(&mut self) -> Option<Vec<i32>> {
        self.restoring(|packet| {
            let count = packet.try_read_count()?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(packet.try_read_i32()?);
            }
            Some(values)
        })
    }

    pub fn try_read_i64_array(&mut self) -> Option<Vec<i64>> {
        self.restoring(|packet| {
            let count = packet.try_read_count()?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(packet.try_read_i64()?);
            }
            Some(values)
        })
    }

    pub fn try_read_f32_array(&mut self) -> Option<Vec<f32>> {
        self.restoring(|packet| {
            let count = packet.try_read_count()?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(packet.try_read_f32()?);
            }
            Some(values)
        })
    }

    pub fn try_read_string_array(&mut self) -> Option<Vec<String>> {
        self.try_read_string_array_with(Encoding::default())
    }

    pub fn try_read_string_array_with(&mut self, encoding: Encoding) -> Option<Vec<String>> {
        self.restoring(|packet| {
            let count = packet.try_read_count()?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(packet.try_read_string_with(encoding)?);
            }
            Some(values)
        })
    }

    /// Reads an element-count prefix. Fails on a short or negative prefix,
    /// or a count larger than one element per remaining byte (every element
    /// encoding occupies at least one byte, so such a count can never be
    /// satisfied and must not drive a huge preallocation).
    fn try_read_count(&mut self) -> Option<usize> {
        let count = usize::try_from(self.try_read_i32()?).ok()?;
        if count > self.unread_len() {
            return None;
        }
        Some(count)
    }

    /// Runs a checked read, restoring the cursor on failure so a failed
    /// multi-part read does not corrupt subsequent reads.
    fn restoring<T>(&mut self, read: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.cursor;
        let result = read(self);
        if result.is_none() {
            self.cursor = start;
        }
        result
    }
}
