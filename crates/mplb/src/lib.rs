//! Runtime-discovered MPlayer slave-mode bindings.
//!
//! mplb drives an external MPlayer process through its line-oriented slave
//! protocol. The command and property vocabulary is not hard-coded: it is
//! discovered from the binary itself at startup, so new player releases are
//! supported without touching this library.
//!
//! # Crate Structure
//!
//! - [`channel`] — Player process spawn and blocking line I/O
//! - [`schema`] — Vocabulary discovery: typed command/property descriptors
//! - [`player`] — Typed proxy over a live player (behind `player` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mplb::channel::LaunchSpec;
//! use mplb::player::Player;
//! use mplb::schema::Schema;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // One discovery pass seeds any number of players.
//! let schema = Arc::new(Schema::discover("mplayer")?);
//!
//! let player = Player::launch(Arc::clone(&schema), &LaunchSpec::new("mplayer"))?;
//! player.load_file("test.ogv")?;
//! let loops = player.get("p_loop")?;
//! println!("loop: {loops:?}");
//! player.quit()?;
//! # Ok(())
//! # }
//! ```

/// Re-export channel types.
pub mod channel {
    pub use mplb_channel::*;
}

/// Re-export schema types.
pub mod schema {
    pub use mplb_schema::*;
}

/// Re-export player types (requires `player` feature).
#[cfg(feature = "player")]
pub mod player {
    pub use mplb_player::*;
}
