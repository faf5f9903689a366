use crate::fault::TransportFault;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so faults reach the
/// error callback in one shape.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Transport(TransportFault),

    #[error("external error: {0}")]
    External(String),
}

impl From<TransportFault> for Error {
    fn from(fault: TransportFault) -> Self {
        Self::Transport(fault)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
