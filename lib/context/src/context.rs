use oxiri::Iri;
use std::borrow::Cow;
use std::collections::HashMap;

/// Container types accepted in `@container` entries.
///
/// GraphQL-LD result shaping is driven by singularization directives rather
/// than containers, so these are parsed and preserved but otherwise
/// uninterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List,
    Set,
}

/// A single term definition inside a parsed context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    /// The expanded IRI this term maps to.
    pub iri: String,
    /// Whether the term is a reverse property (`@reverse`).
    pub reverse: bool,
    /// The value type (`@type`), kept in expanded form.
    pub value_type: Option<String>,
    /// The container (`@container`), if any.
    pub container: Option<Container>,
}

impl TermDefinition {
    pub(crate) fn simple(iri: String) -> Self {
        Self {
            iri,
            reverse: false,
            value_type: None,
            container: None,
        }
    }
}

/// A fully resolved JSON-LD context.
///
/// Instances are produced once by [`ContextParser::parse`](crate::ContextParser::parse)
/// and are immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedJsonLdContext {
    pub(crate) base: Option<String>,
    pub(crate) vocab: Option<String>,
    pub(crate) terms: HashMap<String, TermDefinition>,
}

impl ParsedJsonLdContext {
    /// The `@base` IRI, if one was declared or passed as a parse option.
    pub fn base_iri(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// The `@vocab` IRI, if one was declared.
    pub fn vocab(&self) -> Option<&str> {
        self.vocab.as_deref()
    }

    /// Returns the definition of `term`, if the context declares one.
    pub fn term_definition(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Returns whether the context declares no terms at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.vocab.is_none()
    }

    /// Expands a term into an IRI.
    ///
    /// Expansion follows JSON-LD vocab-mode term expansion restricted to the
    /// features this crate models:
    ///
    /// 1. keywords (`@id`, `@type`, ...) pass through unchanged,
    /// 2. declared terms expand to their definition IRI,
    /// 3. compact IRIs (`prefix:suffix`) expand when `prefix` is a declared
    ///    term, and pass through when they already look like absolute IRIs,
    /// 4. otherwise `@vocab` is prepended when declared.
    ///
    /// Returns `None` when the context gives the term no meaning.
    pub fn expand_term<'a>(&'a self, term: &'a str) -> Option<Cow<'a, str>> {
        if term.starts_with('@') {
            return Some(Cow::Borrowed(term));
        }
        if let Some(def) = self.terms.get(term) {
            return Some(Cow::Borrowed(def.iri.as_str()));
        }
        if let Some((prefix, suffix)) = term.split_once(':') {
            if let Some(def) = self.terms.get(prefix) {
                return Some(Cow::Owned(format!("{}{suffix}", def.iri)));
            }
            // Anything else with a scheme is taken as an absolute IRI.
            return Some(Cow::Borrowed(term));
        }
        if let Some(vocab) = &self.vocab {
            return Some(Cow::Owned(format!("{vocab}{term}")));
        }
        None
    }

    /// Resolves a possibly relative IRI reference against the `@base` IRI.
    ///
    /// Absolute IRIs are returned unchanged; without a base, relative
    /// references are returned as-is.
    pub fn resolve_relative<'a>(&self, iri: &'a str) -> Cow<'a, str> {
        if iri.contains(':') {
            return Cow::Borrowed(iri);
        }
        match &self.base {
            Some(base) => match Iri::parse(base.as_str()).and_then(|b| b.resolve(iri)) {
                Ok(resolved) => Cow::Owned(resolved.into_inner()),
                Err(_) => Cow::Borrowed(iri),
            },
            None => Cow::Borrowed(iri),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(terms: Vec<(&str, TermDefinition)>) -> ParsedJsonLdContext {
        ParsedJsonLdContext {
            base: None,
            vocab: None,
            terms: terms
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
        }
    }

    #[test]
    fn expands_declared_terms() {
        let context = context_with(vec![(
            "name",
            TermDefinition::simple("http://example.org/name".to_owned()),
        )]);
        assert_eq!(
            context.expand_term("name").as_deref(),
            Some("http://example.org/name")
        );
    }

    #[test]
    fn expands_compact_iris_over_declared_prefixes() {
        let context = context_with(vec![(
            "ex",
            TermDefinition::simple("http://example.org/".to_owned()),
        )]);
        assert_eq!(
            context.expand_term("ex:author").as_deref(),
            Some("http://example.org/author")
        );
    }

    #[test]
    fn passes_through_keywords_and_absolute_iris() {
        let context = context_with(vec![]);
        assert_eq!(context.expand_term("@type").as_deref(), Some("@type"));
        assert_eq!(
            context.expand_term("http://example.org/p").as_deref(),
            Some("http://example.org/p")
        );
    }

    #[test]
    fn falls_back_to_vocab() {
        let context = ParsedJsonLdContext {
            base: None,
            vocab: Some("http://example.org/vocab#".to_owned()),
            terms: HashMap::new(),
        };
        assert_eq!(
            context.expand_term("label").as_deref(),
            Some("http://example.org/vocab#label")
        );
    }

    #[test]
    fn unknown_terms_do_not_expand() {
        let context = context_with(vec![]);
        assert_eq!(context.expand_term("label"), None);
    }

    #[test]
    fn resolves_relative_iris_against_base() {
        let context = ParsedJsonLdContext {
            base: Some("http://example.org/dir/".to_owned()),
            vocab: None,
            terms: HashMap::new(),
        };
        assert_eq!(context.resolve_relative("page"), "http://example.org/dir/page");
        assert_eq!(
            context.resolve_relative("http://other.org/x"),
            "http://other.org/x"
        );
    }
}
