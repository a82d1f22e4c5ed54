//! Integration tests for itch-harvest
//!
//! These tests use wiremock to stand in for a creator storefront and run
//! full harvests and job API calls end-to-end.

mod api_tests;
mod scrape_tests;
