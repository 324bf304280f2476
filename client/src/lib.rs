pub mod api;
pub mod errors;
pub mod metrics_defs;
pub mod records;
pub mod transport;

pub use api::ApiClient;
pub use errors::ClientError;
pub use transport::{CallMethod, Transport};
