// Adapters layer: concrete implementations for external systems (local files, CSV).

pub mod export;
pub mod storage;
