//! Text segmentation utilities.
//!
//! - Code point segmentation (`Codepoints`), so slicing never cuts a character
//! - Whitespace-run tokenization (`tokenize`), built on top of it

/// UTF-8 aware splitting of a string into code point fragments.
pub mod codepoints;

/// Splitting of a line into alternating whitespace and non-whitespace tokens.
pub mod tokenizer;
