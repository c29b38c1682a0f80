//! Line-oriented stdio channel to an external MPlayer process.
//!
//! The slave-mode protocol is newline-delimited UTF-8 text over the player's
//! standard streams. This is the lowest layer of mplb: it owns process
//! spawning, blocking line I/O, and termination. Everything else builds on
//! the [`LineIo`] trait provided here.

pub mod error;
pub mod line;
pub mod process;

pub use error::{ChannelError, Result};
pub use line::{LineIo, LineStream};
pub use process::{LaunchSpec, OptionValue, PlayerProcess, SLAVE_MODE_ARGS};
