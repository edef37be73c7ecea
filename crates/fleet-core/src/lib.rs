pub mod config;
pub mod error;
pub mod result;
pub mod status;
pub mod viewport;

pub use config::AppConfig;
pub use error::FleetError;
pub use result::FleetResult;
pub use status::{classify_status, ErrorDisposition};
pub use viewport::{Viewport, ViewportInfo};
