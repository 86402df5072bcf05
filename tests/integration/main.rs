//! Integration tests for Manga-Binder
//!
//! These tests use wiremock to serve a fake catalog and run the pipeline
//! end-to-end over real HTTP.

mod cli_tests;
mod fetch_tests;
mod pipeline_tests;
mod support;
