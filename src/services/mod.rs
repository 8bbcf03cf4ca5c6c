// Author: Dustin Pilgrim
// License: MIT

pub mod idle;
pub mod ticker;
pub mod wayland;
