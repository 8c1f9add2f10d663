use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum ServerError {
    InvalidPort,

    AlreadyListening,

    UnknownClient(u64),

    ClientClosed(u64),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use ServerError::*;
        match self {
            InvalidPort => write!(f, "Port must be in 1..=65535"),
            AlreadyListening => write!(f, "Server is already listening"),
            UnknownClient(id) => write!(f, "Unknown client {}", id),
            ClientClosed(id) => write!(f, "Client {} is closed", id),
        }
    }
}

// use default impl
impl std::error::Error for ServerError {}
