//! Programmatic generation of protobuf source files.
//!
//! This crate provides a plain document model for the protobuf IDL — see the
//! [`ast`] module — together with a deterministic encoder that turns a tree
//! of model nodes into protobuf source text. It is aimed at code generators
//! that would otherwise assemble `.proto` files from string templates: the
//! caller builds the tree, either directly or through the fluent [`builder`]
//! layer, and [`to_string()`] (or [`to_vec()`] / [`to_writer()`]) produces
//! the text in a single pass.
//!
//! The emitted text is **not** guaranteed to be a valid protobuf file. The
//! encoder performs no validation: duplicate field numbers, unresolved type
//! names or malformed identifiers are passed through silently, producing
//! output that will be rejected by the schema compiler downstream. That
//! responsibility is deliberately left with the caller.
//!
//! # Examples
//!
//! ```
//! use protowrite::builder::{FileBuilder, MessageBuilder};
//! use protowrite::ast::Field;
//!
//! let file = FileBuilder::new()
//!     .package("foo.v1")
//!     .message(
//!         MessageBuilder::new("Foo")
//!             .field(Field::string("name", 1))
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(
//!     protowrite::to_string(&file).unwrap(),
//!     "syntax = \"proto3\";\n\npackage foo.v1;\n\nmessage Foo {\n    string name = 1;\n}"
//! );
//! ```
#![warn(missing_debug_implementations, missing_docs)]
#![deny(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/protowrite/0.1.0/")]

pub mod ast;
pub mod builder;

mod encode;
mod error;

#[cfg(test)]
mod tests;

use std::{io, sync::RwLock};

use once_cell::sync::Lazy;

pub use self::error::EncodeError;

use self::encode::{Context, Encode};

static INDENT: Lazy<RwLock<String>> = Lazy::new(|| RwLock::new("    ".to_owned()));

/// Sets the process-wide indentation unit used by subsequent encodes.
///
/// The default is four spaces. The unit is read once at the start of each
/// encode, so changing it never affects output already written; it should
/// nevertheless be treated as set-once-at-startup configuration, and must not
/// be changed while an encode is in flight on another thread.
pub fn set_indent(unit: impl Into<String>) {
    let unit = unit.into();
    match INDENT.write() {
        Ok(mut guard) => *guard = unit,
        Err(poisoned) => *poisoned.into_inner() = unit,
    }
}

pub(crate) fn indent_unit() -> String {
    match INDENT.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Encodes a file to a byte vector.
///
/// The output is returned exactly as written, without a trailing newline. On
/// failure the error identifies the declaration that could not be encoded by
/// kind, index and enclosing declaration name, and no output is returned.
pub fn to_vec(file: &ast::File) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    to_writer(file, &mut buf)?;
    Ok(buf)
}

/// Encodes a file to a string.
///
/// See [`to_vec()`] for details.
pub fn to_string(file: &ast::File) -> Result<String, EncodeError> {
    let buf = to_vec(file)?;
    // The encoder only ever writes string slices, so the output is always
    // valid utf-8.
    Ok(String::from_utf8(buf).expect("encoded output is valid utf-8"))
}

/// Encodes a file into the given writer.
///
/// Encoding aborts on the first failed write; the contents of the writer are
/// unspecified if an error is returned.
pub fn to_writer<W>(file: &ast::File, dst: &mut W) -> Result<(), EncodeError>
where
    W: io::Write,
{
    file.encode(&Context::root(), dst)
        .map_err(EncodeError::from_kind)
}
