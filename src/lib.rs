//! # phpfmt
//!
//! A PHP code formatter built from small, independent rewriting passes over a token stream.
//!
//! See the [php module](php) for the tokenizer, the rewriting engine every pass is built on,
//! the pass catalogue and the pipeline that chains them.

pub mod php;
