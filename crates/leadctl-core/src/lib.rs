//! Core leadctl library (API client, session, lead browsing, config).

pub mod api;
pub mod config;
pub mod leads;
pub mod pager;
pub mod session;
pub mod store;
