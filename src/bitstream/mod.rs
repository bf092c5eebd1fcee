//! The bitstream module forms the I/O subsystem for the coder.
//!
//! Codewords are variable length, so both the compressed data and the serialized coding tables
//! are bitstreams rather than byte streams. A BitWriter only ever writes and a BitReader only
//! ever reads; each owns the underlying stream and stages data through a fixed size buffer.
//!
//! Bits are packed most significant bit first within each byte.
//!
pub mod bitreader;
pub mod bitwriter;

/// Size of the staging buffer used by both sides of the bitstream.
pub const BUFFER_SIZE: usize = 32 * 1024;
