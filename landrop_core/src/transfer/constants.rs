/// TCP port the one-shot file transfer listens on.
pub const TRANSFER_PORT: u16 = 8989;

/// Chunk size for the buffered copy path and for body reads on the
/// receiving side.
pub const BUFFER_SIZE: usize = 512 * 1024;

/// Longest file name carried in the wire header, in bytes.
pub const MAX_FILENAME_LENGTH: usize = 255;
