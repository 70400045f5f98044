//! Photostream - Flickr and Unsplash images behind one resource contract
//!
//! This library fetches image bytes at fixed size variants and normalized
//! photo metadata from Flickr and Unsplash. Every fetch is cache-first with
//! write-through, and coordinate-only locations are optionally enriched by a
//! reverse geocoder.

pub mod cache;
pub mod config;
pub mod geocode;
pub mod image;
pub mod logging;
pub mod provider;
