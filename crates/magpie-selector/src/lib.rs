//! CSS selector support for magpie.
//!
//! This crate implements the selector side of value clipping per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/):
//!
//! - **Model** - simple/compound/complex selectors, combinators, specificity
//! - **Parsing** - selector strings into the model (escape-aware)
//! - **Matching** - selectors against elements with full tree context
//! - **Querying** - document-wide match scans used for uniqueness probes
//! - **Escaping** - CSSOM identifier/string serialization
//! - **Generation** - producing a unique, robust selector for an element,
//!   tunable along a specificity/robustness trade-off
//!
//! The generator is a pure function over the DOM snapshot: it issues
//! read-only document-wide queries and never mutates the tree.

pub mod escape;
pub mod generate;
pub mod matching;
pub mod model;
pub mod parse;
pub mod query;

pub use escape::{escape_attribute_value, escape_ident};
pub use generate::{LevelSettings, SpecificityLevel, generate};
pub use model::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, ParsedSelector, PseudoClass,
    SimpleSelector, Specificity,
};
pub use parse::parse_selector;
pub use query::{count_matches, query_all, query_first, resolves_uniquely_to};
