use thiserror::Error;

use crate::transfer::constants::MAX_FILENAME_LENGTH;
use crate::transfer::utils::sanitize_file_name;

/// Bytes reserved for the name in the wire header, including the
/// terminating NUL.
const NAME_FIELD: usize = MAX_FILENAME_LENGTH + 1;

/// Contract violations in the transfer protocol itself, as opposed to plain
/// I/O failures.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("file size in header is negative ({0})")]
    NegativeSize(i64),
    #[error("file name is empty")]
    EmptyName,
    #[error("file size {0} does not fit the wire header")]
    OversizeFile(u64),
    #[error("connection closed after {received} of {total} bytes")]
    Truncated { received: u64, total: u64 },
}

/// Metadata for one file, exchanged as a fixed-size header before the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Safe base name, never empty and never containing path separators.
    pub name: String,
    pub size: u64,
    /// Permission bits, already masked to `0o7777`.
    pub mode: u32,
}

impl FileMeta {
    /// Encoded header length: name field, then size as i64, then mode as u32,
    /// all big-endian.
    pub const WIRE_LEN: usize = NAME_FIELD + 8 + 4;

    pub fn new(name: &str, size: u64, mode: u32) -> Result<Self, TransferError> {
        if size > i64::MAX as u64 {
            return Err(TransferError::OversizeFile(size));
        }
        if name.is_empty() {
            return Err(TransferError::EmptyName);
        }
        Ok(FileMeta {
            name: sanitize_file_name(name),
            size,
            mode: mode & 0o7777,
        })
    }

    pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
        let mut buf = [0u8; Self::WIRE_LEN];

        let name = self.name.as_bytes();
        let len = name.len().min(MAX_FILENAME_LENGTH);
        buf[..len].copy_from_slice(&name[..len]);

        buf[NAME_FIELD..NAME_FIELD + 8].copy_from_slice(&(self.size as i64).to_be_bytes());
        buf[NAME_FIELD + 8..].copy_from_slice(&self.mode.to_be_bytes());
        buf
    }

    /// Parses a header received from the network. The name is sanitized
    /// again here, so a hostile sender cannot plant path separators.
    pub fn decode(buf: &[u8; Self::WIRE_LEN]) -> Result<Self, TransferError> {
        let name_field = &buf[..NAME_FIELD];
        let end = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_FILENAME_LENGTH);
        if end == 0 {
            return Err(TransferError::EmptyName);
        }
        let name = String::from_utf8_lossy(&name_field[..end]);

        let mut size_bytes = [0u8; 8];
        size_bytes.copy_from_slice(&buf[NAME_FIELD..NAME_FIELD + 8]);
        let size = i64::from_be_bytes(size_bytes);
        if size < 0 {
            return Err(TransferError::NegativeSize(size));
        }

        let mut mode_bytes = [0u8; 4];
        mode_bytes.copy_from_slice(&buf[NAME_FIELD + 8..]);
        let mode = u32::from_be_bytes(mode_bytes);

        Ok(FileMeta {
            name: sanitize_file_name(&name),
            size: size as u64,
            mode: mode & 0o7777,
        })
    }
}
