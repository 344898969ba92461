//! Parsing of [JSON-LD contexts](https://www.w3.org/TR/json-ld11/#the-context)
//! into an immutable term map.
//!
//! A context maps short field names onto IRIs. GraphQL-LD uses it to interpret
//! GraphQL field names as RDF predicates, so only the subset of JSON-LD that is
//! meaningful for that interpretation is modeled here: term definitions
//! (string and object form), compact IRI expansion, `@vocab`, `@base` and
//! `@reverse`. Contexts may be given inline, as an array of contexts that are
//! merged left to right, or as a URL to a remote context document.
//!
//! ```
//! use graphql_ld_context::{ContextParser, ContextParserOptions, JsonLdContextSource};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let source = JsonLdContextSource::from(json!({
//!     "ex": "http://example.org/",
//!     "name": "ex:name",
//! }));
//! let context = ContextParser::new()
//!     .parse(&source, &ContextParserOptions::default())
//!     .await?;
//! assert_eq!(
//!     context.expand_term("name").as_deref(),
//!     Some("http://example.org/name")
//! );
//! # Result::<_, graphql_ld_context::ContextError>::Ok(())
//! # }).unwrap();
//! ```

mod context;
mod error;
mod parser;

pub use context::{Container, ParsedJsonLdContext, TermDefinition};
pub use error::ContextError;
pub use parser::{ContextParser, ContextParserOptions, JsonLdContextSource};
