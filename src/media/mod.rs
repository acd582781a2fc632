/// Product image module
///
/// This module handles:
/// - Downloading product thumbnails and carousel images
/// - Resizing them to a fixed tier size
/// - Caching the results to disk so each image is fetched once

pub mod cache;

pub use cache::{ImageCache, Tier};
