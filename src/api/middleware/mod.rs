//! HTTP middleware shared by the API and the web pages.

pub mod tracing;
