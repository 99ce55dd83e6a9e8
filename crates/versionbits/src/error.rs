use std::fmt;

use iop_consensus::{hash256_to_display_hex, Hash256};

use crate::headers::LookupError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VersionBitsError {
    UnknownDeployment(String),
    MissingHeader(Hash256),
    Lookup(LookupError),
    MissingRequiredSignal { name: &'static str, bit: u8 },
}

impl fmt::Display for VersionBitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBitsError::UnknownDeployment(name) => write!(f, "unknown deployment {name}"),
            VersionBitsError::MissingHeader(hash) => {
                write!(f, "missing header {}", hash256_to_display_hex(hash))
            }
            VersionBitsError::Lookup(err) => write!(f, "{err}"),
            VersionBitsError::MissingRequiredSignal { name, bit } => {
                write!(f, "block version does not signal required deployment {name} (bit {bit})")
            }
        }
    }
}

impl std::error::Error for VersionBitsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VersionBitsError::Lookup(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LookupError> for VersionBitsError {
    fn from(err: LookupError) -> Self {
        VersionBitsError::Lookup(err)
    }
}
