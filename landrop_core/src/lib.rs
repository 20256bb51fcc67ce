//! LAN single-file drop: UDP broadcast discovery plus a one-shot TCP
//! transfer of a fixed metadata header and the raw file body.
//!
//! One peer advertises a file and serves the first device that asks; the
//! other broadcasts a probe, connects to whoever answered, and writes the
//! file to disk. One discovery exchange, one transfer, strictly in that
//! order.

pub mod discovery;
pub mod net;
pub mod progress;
pub mod transfer;

// Re-export public API
pub use discovery::{Advertiser, DISCOVERY_PORT, DISCOVERY_TIMEOUT, discover};
pub use progress::{Band, NullProgress, ProgressSink};
pub use transfer::{FileMeta, FileServer, ReceivedFile, TRANSFER_PORT, TransferError, fetch_file};
