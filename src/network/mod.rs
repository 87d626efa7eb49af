//! Network Layer: UDP transport around the codec
//!
//! Menggunakan mio untuk non-blocking receive polling.
//!
//! Fitur:
//! - Connected UDP sender with broadcast support
//! - Single reused receive buffer, messages lent to a callback
//! - No retries or flow control

mod client;
mod receiver;

pub use client::{ClientError, OscClient};
pub use receiver::{OscReceiver, ReceiverStats};
