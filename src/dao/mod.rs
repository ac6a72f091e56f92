/// Remote live-score stores (game list, live score mirroring).
pub mod live_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for backend failures.
pub mod storage;
