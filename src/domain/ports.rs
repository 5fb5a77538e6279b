use crate::utils::error::Result;

/// Anything stored in a `Repository`, keyed by a unique, immutable identifier.
pub trait Identifiable {
    /// Entity name used in logs and error messages.
    const KIND: &'static str;

    fn identifier(&self) -> &str;
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
}
