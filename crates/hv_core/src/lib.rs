//! Extraction engine for HentaiVerse battle page captures.
//!
//! A capture is one rendered HTML document of the combat screen. The engine
//! parses it once and runs independent field parsers over the tree, producing
//! a [`core_api::Snapshot`] plus a list of non-fatal warnings.

pub mod core_api;
pub mod dom;
pub mod parsers;
