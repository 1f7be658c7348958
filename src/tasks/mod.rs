//! Embassy tasks of the firmware.
//!
//! - [`net_task`]: WiFi station, TCP server, line framing. Produces command lines.
//! - [`dispatch_task`]: owns the rig and consumes the command queue.
//!
//! Tasks are spawned from `main.rs` and only share the command channel.
pub mod dispatch_task;
pub mod net_task;
