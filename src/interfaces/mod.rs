//! Inbound and outbound adapters: CSV seed files and the HTTP API.

pub mod csv;
pub mod http;
