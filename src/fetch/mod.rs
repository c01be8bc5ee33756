// src/fetch/mod.rs
// =============================================================================
// This module makes the HTTP requests.
//
// Submodules:
// - client: the shared HTTP client, page fetching and the in-flight limit
//
// Every network call in the program goes through `Fetcher`, which is how
// the --jobs limit applies to listings and downloads alike.
// =============================================================================

mod client;

pub use client::Fetcher;
