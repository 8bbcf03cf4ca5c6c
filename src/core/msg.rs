// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::oneshot;

use crate::core::{
    events::{Command, Event},
    snapshot::StatusSnapshot,
};

/// Mailbox messages for the daemon task. Everything that can mutate the timer
/// travels through this one channel, which is what serializes ticks and
/// commands (single-writer discipline).
#[derive(Debug)]
pub enum TimerMsg {
    Event(Event),

    Command {
        cmd: Command,
        reply: oneshot::Sender<String>,
    },

    GetStatus {
        reply: oneshot::Sender<StatusSnapshot>,
    },

    StopDaemon {
        reply: oneshot::Sender<String>,
    },
}
