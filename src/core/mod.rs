// Author: Dustin Pilgrim
// License: MIT

pub mod events;
pub mod msg;
pub mod snapshot;
pub mod store;
pub mod timer;
pub mod utils;

#[cfg(test)]
mod timer_tests;
