// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "perch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Perch sitting timer"
)]
pub struct Args {
    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Display the current sitting session")]
    Status {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Start or resume the sitting session")]
    Start,

    #[command(about = "Pause the sitting session")]
    Pause,

    #[command(about = "Reset the sitting session to zero")]
    Reset,

    #[command(about = "Shift the session by a number of seconds (negative rewinds)")]
    FastForward {
        seconds: i64,
    },

    #[command(about = "Set the yellow and red warning thresholds, in seconds")]
    Thresholds {
        yellow: u64,
        red: u64,
    },

    #[command(about = "Set how long input must be idle before the session resets, in seconds")]
    IdleReset {
        seconds: u64,
    },

    #[command(about = "Force the idle path regardless of real input activity")]
    SimulateIdle {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    #[command(about = "Stop the running perch daemon")]
    Stop,

    #[command(about = "Dump recent log lines")]
    Dump {
        #[arg(default_value_t = 40)]
        lines: usize,
    },
}
