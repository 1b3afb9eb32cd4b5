use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidModelYear(u16),
    InvalidArchetype(String),
    InvalidStatus(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidModelYear(year) => {
                write!(f, "unsupported model year: {year}")
            }
            ModelError::InvalidArchetype(label) => {
                write!(f, "unknown analytical scenario: {label}")
            }
            ModelError::InvalidStatus(status) => {
                write!(f, "unknown scenario status: {status}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
