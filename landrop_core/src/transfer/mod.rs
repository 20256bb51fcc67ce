//! One-shot TCP file transfer.
//!
//! The sender listens, accepts a single connection, writes a fixed 268-byte
//! metadata header and then the raw body. The receiver reads the header in
//! full before creating anything on disk, then reads exactly the announced
//! number of body bytes.

pub mod constants;
pub mod copy;
pub mod protocol;
pub mod receiver;
pub mod sender;
pub mod utils;

pub use constants::TRANSFER_PORT;
pub use protocol::{FileMeta, TransferError};
pub use receiver::{ReceivedFile, fetch_file};
pub use sender::FileServer;
pub use utils::format_file_size;
