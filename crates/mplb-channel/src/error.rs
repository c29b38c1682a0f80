use std::path::PathBuf;

/// Errors that can occur while launching or talking to the player process.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The player binary does not exist or is not executable.
    #[error("player not found at {}", path.display())]
    PlayerNotFound { path: PathBuf },

    /// The player process could not be spawned for another reason.
    #[error("failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the player's standard streams.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
