//! Bidirectional conversion between the remote block-tree and flat text.
//!
//! Pure and stateless: rendering never consults the namespace index, and the
//! parser never calls the gateway. Round-tripping is guaranteed only for the
//! supported construct subset; unsupported-block markers re-parse as plain
//! paragraphs.

mod blocks;
pub use self::blocks::*;

mod render;
pub use self::render::render;

mod parse;
pub use self::parse::parse;
