//! Figma file-export support for figport.
//!
//! This module decodes the JSON returned by the Figma REST API into a typed
//! node tree that the scene builder walks.
//!
//! ## Supported Endpoints
//!
//! - `GET /v1/files/:key`: full document tree and component metadata
//! - `GET /v1/images/:key`: rendered image URLs
//!
//! ## Not Decoded
//!
//! - Comments, projects and team endpoints
//! - Vector geometry (`fillGeometry`, `strokeGeometry`)
//! - Prototyping interactions beyond `transitionNodeId`
//!
//! # Example
//!
//! ```ignore
//! use figport_core::figma::decode_file;
//!
//! let file = decode_file(&std::fs::read_to_string("file.json")?)?;
//! println!("{} has {} nodes", file.name, file.document.count());
//! ```

mod wire;
mod types;
mod decode;

pub use wire::*;
pub use types::*;
pub use decode::*;
