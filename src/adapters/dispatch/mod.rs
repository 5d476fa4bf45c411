//! Downstream API dispatch

pub mod http;
pub mod traits;

pub use http::HttpDispatcher;
pub use traits::Dispatcher;
