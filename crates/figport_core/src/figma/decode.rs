//! Figma JSON decoder.
//!
//! Turns the text of a `GET /v1/files/:key` response into a
//! [`FileResponse`]. Decoding is strict: malformed JSON, a missing required
//! field or an unrecognized enum string aborts the whole decode.

use std::collections::HashSet;
use std::io::Read;

use serde_json::error::Category;
use thiserror::Error;

use super::types::{FileResponse, ImageResponse};
use super::wire::NodeType;

/// Errors that can occur while decoding a Figma document.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid Figma document at line {line}, column {column}: {message}")]
    Invalid {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unrecognized {kind} value `{value}`")]
    UnknownWireValue { kind: &'static str, value: String },

    #[error("Document root must be DOCUMENT, found {0}")]
    UnexpectedRoot(NodeType),

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Failed to encode Figma document: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        match err.classify() {
            Category::Io => SchemaError::Io(err.into()),
            Category::Syntax | Category::Eof => SchemaError::Malformed {
                line,
                column,
                message: err.to_string(),
            },
            Category::Data => SchemaError::Invalid {
                line,
                column,
                message: err.to_string(),
            },
        }
    }
}

/// Result type for decoding operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Decode a Figma file response from JSON text.
pub fn decode_file(json: &str) -> SchemaResult<FileResponse> {
    let file: FileResponse = serde_json::from_str(json)?;
    validate(&file)?;
    log::debug!(
        "Decoded Figma file '{}' ({} nodes, {} components)",
        file.name,
        file.document.count(),
        file.components.len()
    );
    Ok(file)
}

/// Decode a Figma file response from a reader.
pub fn decode_file_from_reader<R: Read>(reader: R) -> SchemaResult<FileResponse> {
    let file: FileResponse = serde_json::from_reader(reader)?;
    validate(&file)?;
    Ok(file)
}

/// Encode a file response back to Figma JSON.
pub fn encode_file(file: &FileResponse) -> SchemaResult<String> {
    serde_json::to_string_pretty(file).map_err(|e| SchemaError::Encode(e.to_string()))
}

/// Decode the response of the image export endpoint.
pub fn decode_image_response(json: &str) -> SchemaResult<ImageResponse> {
    Ok(serde_json::from_str(json)?)
}

/// Structural checks serde cannot express: root type and unique IDs.
fn validate(file: &FileResponse) -> SchemaResult<()> {
    let root = &file.document;
    if root.node_type != NodeType::Document {
        return Err(SchemaError::UnexpectedRoot(root.node_type));
    }

    let mut seen = HashSet::new();
    for node in root.iter() {
        if !seen.insert(node.id.as_str()) {
            return Err(SchemaError::DuplicateId(node.id.clone()));
        }
    }

    for page in root.children() {
        if page.node_type != NodeType::Canvas {
            log::warn!(
                "Document child '{}' is {} rather than CANVAS",
                page.name,
                page.node_type
            );
        }
    }

    Ok(())
}
