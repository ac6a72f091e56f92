mod config;
mod error;
mod store;

pub use config::SupabaseConfig;
pub use error::{SupabaseError, SupabaseResult};
pub use store::SupabaseStore;
