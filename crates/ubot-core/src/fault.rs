use std::fmt;

/// Messenger-neutral description of a transport failure.
///
/// `Api` covers rejections reported by the Bot API itself (bad token, bot blocked,
/// flood control); everything else (network, decoding, i/o) is `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportFault {
    Api { code: u16, message: String },
    Other(String),
}

impl TransportFault {
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { code, message } => write!(f, "Telegram API Error:\n[{code}]\n{message}"),
            Self::Other(message) => f.write_str(message),
        }
    }
}
