/// Maps domain errors to HTTP responses
pub mod error_handling;
/// Bearer-token session extraction
pub mod session;
