//! Validation trait definition

/// Validation trait for configuration structures that span several sections
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
