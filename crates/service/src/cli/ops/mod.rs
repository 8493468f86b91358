pub mod health;
pub mod resolve;
pub mod serve;
pub mod submit;
pub mod version;

pub use health::Health;
pub use serve::Serve;
pub use submit::Submit;
pub use version::Version;

// `resolve` implements the op directly on the API request type.
pub use service::http_server::clients::ResolveRequest as Resolve;
