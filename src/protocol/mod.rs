//! Order-file protocol.
//!
//! Turns the free text of a species' order file into command lines with
//! typed operand access for the combat dispatcher.

pub mod tokenizer;

pub use tokenizer::{abbreviates, tokenize, tokenize_line, Keyword, OrderLine, Operands, TokenError};
