//! Typed, validated proxy over a live MPlayer slave-mode process.
//!
//! This is the "just works" layer. Build a [`Player`] from a discovered
//! [`mplb_schema::Schema`] and drive the process by name: `invoke` for
//! commands, `get`/`set` for properties, all validated against the
//! discovered descriptors before anything touches the wire.

pub mod dispatch;
pub mod error;
pub mod player;
pub mod property;

pub use dispatch::{dispatch, Pausing};
pub use error::{PlayerError, Result};
pub use player::{Player, PlayerConfig};
pub use property::PropertyValue;
