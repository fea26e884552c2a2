use crate::error::EtbdError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), EtbdError>;
}

/// Builds a configuration error prefixed with the offending section.
pub(crate) fn invalid<S: ConfigSection>(message: impl Into<String>) -> EtbdError {
    EtbdError::Configuration(format!("[{}] {}", S::section_name(), message.into()))
}
