//! Classification of remote server status codes.
//!
//! Every status the server can answer with falls into exactly one
//! [`ErrorDisposition`]; nothing is swallowed by comparing against a
//! single magic number at the call site.

/// What the sync layer does with a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Treat the request as "no data available under current permissions".
    EmptyResult,
    /// Report to the user and offer a retry.
    Retry,
    /// Report to the user without a retry.
    Report,
}

pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const REQUEST_TIMEOUT: u16 = 408;
pub const TOO_MANY_REQUESTS: u16 = 429;
pub const INTERNAL_SERVER_ERROR: u16 = 500;
pub const BAD_GATEWAY: u16 = 502;
pub const SERVICE_UNAVAILABLE: u16 = 503;
pub const GATEWAY_TIMEOUT: u16 = 504;

pub fn classify_status(status: u16) -> ErrorDisposition {
    match status {
        FORBIDDEN => ErrorDisposition::EmptyResult,
        REQUEST_TIMEOUT
        | TOO_MANY_REQUESTS
        | INTERNAL_SERVER_ERROR
        | BAD_GATEWAY
        | SERVICE_UNAVAILABLE
        | GATEWAY_TIMEOUT => ErrorDisposition::Retry,
        _ => ErrorDisposition::Report,
    }
}
