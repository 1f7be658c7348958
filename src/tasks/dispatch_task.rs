use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Receiver};
use log::info;

use crate::config::COMMAND_QUEUE_SIZE;
use crate::hw::Rig;
use crate::robot::dispatcher::CommandDispatcher;
use crate::transport::CommandLine;

/// Sole owner of the servos. Lines are applied in arrival order.
#[embassy_executor::task]
pub async fn dispatch_task(
    rig: Rig,
    receiver: Receiver<'static, CriticalSectionRawMutex, CommandLine, COMMAND_QUEUE_SIZE>,
) {
    info!("[DISPATCH] rig handed to dispatcher");
    let mut dispatcher = CommandDispatcher::new(rig);
    dispatcher.run(receiver).await;
}
