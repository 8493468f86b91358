mod freshness;
mod memory;
mod provider;
#[allow(clippy::module_inception)]
mod registry;

pub use freshness::{FreshnessPolicy, DEFAULT_EXPIRY_INTERVAL, DEFAULT_TOUCH_INTERVAL};
pub use memory::{MemoryRegistryProvider, MemoryRegistryProviderError};
pub use provider::{RecordRow, RegistryError, RegistryProvider};
pub use registry::{Record, Registry};
