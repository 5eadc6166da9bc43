// Adapters layer: concrete implementations for external systems (filesystem, delimited files, remote climate source).

pub mod climate_csv;
pub mod power;
pub mod storage;
