//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod header_context_provider;
mod static_context_provider;

pub use header_context_provider::{
    HeaderContextError, HeaderContextProvider, parse_context_headers,
};
pub use static_context_provider::StaticContextProvider;
