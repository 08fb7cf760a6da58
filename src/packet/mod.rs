//! Length-delimited binary packet codec shared by both endpoints.
//!
//! A [`Packet`] is a growable byte buffer with sequential typed writes and
//! cursor-advancing typed reads. All multi-byte values are encoded
//! little-endian regardless of host architecture, so packets built on one
//! machine parse identically on any other.

pub mod codec;
pub mod encoding;
pub mod tests;

pub use codec::Packet;
pub use encoding::Encoding;
