//! artboard-parse: Content-stream lexer, parser, and interpreter.
//!
//! Decodes the content-stream sub-language of Illustrator/PDF-derived files
//! into the scene tree defined by [`artboard_core`]: a byte-level lexer, a
//! recursive-descent operand parser, a generic operator parser shared by
//! content and CMap streams, and a stateful interpreter driving the path
//! and text builders with font and colour-space resolution on demand.
//!
//! The outer file reader is not implemented here: object streams arrive
//! through the injected [`StreamFetcher`] collaborator, and resources
//! arrive pre-resolved in a [`Resources`] descriptor.

pub mod cmap;
pub mod content_op;
pub mod encoding;
pub mod error;
pub mod font;
pub mod interpreter;
pub mod lexer;
pub mod operand;
pub mod operator;
pub mod path_builder;
pub mod session;
pub mod text_builder;

pub use artboard_core;
pub use content_op::ContentOp;
pub use error::ParseError;
pub use font::{DifferencesEntry, EncodingRef, Font, FontRef, FontResolver, ObjId};
pub use interpreter::{Resources, parse_content};
pub use operand::Operand;
pub use session::{Artboard, Session, StreamFetcher};

use artboard_core::Warning;

/// Record a warning, mirroring it to the log when tracing is enabled.
pub(crate) fn record(warnings: &mut Vec<Warning>, warning: Warning) {
    #[cfg(feature = "tracing")]
    tracing::warn!(code = warning.code.as_str(), "{}", warning.description);
    warnings.push(warning);
}
