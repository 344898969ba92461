use crate::context::{Container, ParsedJsonLdContext, TermDefinition};
use crate::error::ContextError;
use oxiri::Iri;
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashMap, VecDeque};

/// Bounds nesting of remote contexts and inner `@context` wrappers.
const MAX_CONTEXT_DEPTH: usize = 8;
/// Bounds chained prefix expansion inside one context document.
const MAX_PREFIX_DEPTH: usize = 16;

/// A JSON-LD context definition as accepted from the outside.
///
/// Mirrors the value space of a `@context` entry: an inline object, an array
/// of contexts merged left to right, or a URL pointing at a remote context
/// document.
#[derive(Debug, Clone)]
pub enum JsonLdContextSource {
    /// A URL of a remote context document to fetch.
    Remote(String),
    /// An inline context object (or `null` to reset).
    Inline(JsonValue),
    /// An ordered list of contexts, applied left to right.
    Compound(Vec<JsonLdContextSource>),
}

impl From<JsonValue> for JsonLdContextSource {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::String(url) => Self::Remote(url),
            JsonValue::Array(items) => {
                Self::Compound(items.into_iter().map(Self::from).collect())
            }
            other => Self::Inline(other),
        }
    }
}

impl From<&str> for JsonLdContextSource {
    fn from(url: &str) -> Self {
        Self::Remote(url.to_owned())
    }
}

impl From<String> for JsonLdContextSource {
    fn from(url: String) -> Self {
        Self::Remote(url)
    }
}

/// Options for [`ContextParser::parse`].
#[derive(Debug, Clone, Default)]
pub struct ContextParserOptions {
    /// A base IRI to resolve relative IRIs against, unless the context itself
    /// declares `@base`.
    pub base_iri: Option<String>,
}

/// Parses [`JsonLdContextSource`]s into [`ParsedJsonLdContext`]s.
///
/// The parser owns an HTTP client for remote contexts and can be shared and
/// reused across parses.
#[derive(Debug, Clone, Default)]
pub struct ContextParser {
    http: reqwest::Client,
}

/// One normalization step: either a flat map of term definitions or a
/// `null` reset.
enum Layer {
    Terms(Map<String, JsonValue>),
    Reset,
}

/// A term definition before IRI resolution against its sibling terms.
#[derive(Default)]
struct RawDef {
    id: Option<String>,
    reverse: bool,
    value_type: Option<String>,
    container: Option<Container>,
    remove: bool,
}

impl ContextParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a context definition into its resolved form.
    ///
    /// Remote contexts are fetched over HTTP, arrays are merged in order and
    /// a wrapping `"@context"` key is unwrapped. Any structural problem is
    /// reported as [`ContextError`].
    pub async fn parse(
        &self,
        source: &JsonLdContextSource,
        options: &ContextParserOptions,
    ) -> Result<ParsedJsonLdContext, ContextError> {
        if let Some(base) = &options.base_iri {
            Iri::parse(base.as_str()).map_err(|source| ContextError::InvalidBaseIri {
                iri: base.clone(),
                source,
            })?;
        }

        let layers = self.normalize(source.clone()).await?;

        let mut context = ParsedJsonLdContext {
            base: options.base_iri.clone(),
            vocab: None,
            terms: HashMap::new(),
        };
        for layer in layers {
            match layer {
                Layer::Reset => {
                    context = ParsedJsonLdContext {
                        base: options.base_iri.clone(),
                        vocab: None,
                        terms: HashMap::new(),
                    };
                }
                Layer::Terms(map) => apply_layer(&mut context, &map)?,
            }
        }
        Ok(context)
    }

    /// Flattens a context source into an ordered list of term-map layers,
    /// fetching remote documents as they are encountered.
    async fn normalize(
        &self,
        source: JsonLdContextSource,
    ) -> Result<Vec<Layer>, ContextError> {
        let mut layers = Vec::new();
        let mut queue: VecDeque<(JsonLdContextSource, usize)> = VecDeque::new();
        queue.push_back((source, 0));

        while let Some((item, depth)) = queue.pop_front() {
            match item {
                JsonLdContextSource::Compound(items) => {
                    for entry in items.into_iter().rev() {
                        queue.push_front((entry, depth));
                    }
                }
                JsonLdContextSource::Remote(url) => {
                    if depth >= MAX_CONTEXT_DEPTH {
                        return Err(ContextError::Cyclic(url));
                    }
                    let document = self.fetch(&url).await?;
                    let inner = match document {
                        JsonValue::Object(mut map) if map.contains_key("@context") => {
                            map.remove("@context").unwrap_or(JsonValue::Null)
                        }
                        other => other,
                    };
                    queue.push_front((JsonLdContextSource::from(inner), depth + 1));
                }
                JsonLdContextSource::Inline(JsonValue::Null) => layers.push(Layer::Reset),
                JsonLdContextSource::Inline(JsonValue::Object(mut map)) => {
                    if let Some(inner) = map.remove("@context") {
                        if depth >= MAX_CONTEXT_DEPTH {
                            return Err(ContextError::Cyclic("@context".to_owned()));
                        }
                        queue.push_front((JsonLdContextSource::from(inner), depth + 1));
                    } else {
                        layers.push(Layer::Terms(map));
                    }
                }
                JsonLdContextSource::Inline(other) => {
                    return Err(ContextError::Invalid(format!(
                        "expected an object, array, string or null, found {other}"
                    )));
                }
            }
        }
        Ok(layers)
    }

    async fn fetch(&self, url: &str) -> Result<JsonValue, ContextError> {
        let response = self
            .http
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "application/ld+json, application/json",
            )
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| ContextError::Load {
                url: url.to_owned(),
                source,
            })?;
        response.json().await.map_err(|source| ContextError::Load {
            url: url.to_owned(),
            source,
        })
    }
}

/// Merges one term-map layer into the context being built.
fn apply_layer(
    context: &mut ParsedJsonLdContext,
    map: &Map<String, JsonValue>,
) -> Result<(), ContextError> {
    // Keywords first: term resolution below may depend on @vocab and @base.
    for (key, value) in map {
        match key.as_str() {
            "@base" => match value {
                JsonValue::Null => context.base = None,
                JsonValue::String(iri) => {
                    Iri::parse(iri.as_str()).map_err(|source| {
                        ContextError::InvalidBaseIri {
                            iri: iri.clone(),
                            source,
                        }
                    })?;
                    context.base = Some(iri.clone());
                }
                other => {
                    return Err(ContextError::Invalid(format!(
                        "@base must be a string or null, found {other}"
                    )));
                }
            },
            "@vocab" => match value {
                JsonValue::Null => context.vocab = None,
                JsonValue::String(iri) => context.vocab = Some(iri.clone()),
                other => {
                    return Err(ContextError::Invalid(format!(
                        "@vocab must be a string or null, found {other}"
                    )));
                }
            },
            // Accepted but uninterpreted in this subset.
            "@version" | "@language" | "@propagate" | "@protected" | "@import" => {}
            _ => {}
        }
    }

    let mut raw: HashMap<&str, RawDef> = HashMap::new();
    for (key, value) in map {
        if key.starts_with('@') {
            continue;
        }
        let def = parse_raw_definition(key, value)?;
        raw.insert(key.as_str(), def);
    }

    let names: Vec<&str> = raw.keys().copied().collect();
    for name in names {
        let def = &raw[name];
        if def.remove {
            context.terms.remove(name);
            continue;
        }
        let iri = resolve_term_iri(name, &raw, context, 0)?;
        let value_type = match &def.value_type {
            Some(t) if t.starts_with('@') => Some(t.clone()),
            Some(t) => Some(expand_definition_value(t, &raw, context, 0)?),
            None => None,
        };
        let resolved = TermDefinition {
            iri,
            reverse: def.reverse,
            value_type,
            container: def.container,
        };
        context.terms.insert(name.to_owned(), resolved);
    }
    Ok(())
}

fn parse_raw_definition(term: &str, value: &JsonValue) -> Result<RawDef, ContextError> {
    match value {
        JsonValue::Null => Ok(RawDef {
            remove: true,
            ..RawDef::default()
        }),
        JsonValue::String(iri) => Ok(RawDef {
            id: Some(iri.clone()),
            ..RawDef::default()
        }),
        JsonValue::Object(def) => {
            let mut raw = RawDef::default();
            for (key, entry) in def {
                match key.as_str() {
                    "@id" => raw.id = Some(string_entry(term, key, entry)?),
                    "@reverse" => {
                        raw.id = Some(string_entry(term, key, entry)?);
                        raw.reverse = true;
                    }
                    "@type" => raw.value_type = Some(string_entry(term, key, entry)?),
                    "@container" => raw.container = parse_container(term, entry)?,
                    // Unknown entries (e.g. @language) are ignored.
                    _ => {}
                }
            }
            Ok(raw)
        }
        other => Err(ContextError::Invalid(format!(
            "definition of term '{term}' must be a string, object or null, found {other}"
        ))),
    }
}

fn string_entry(term: &str, key: &str, value: &JsonValue) -> Result<String, ContextError> {
    value
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ContextError::Invalid(format!("{key} of term '{term}' must be a string"))
        })
}

fn parse_container(term: &str, value: &JsonValue) -> Result<Option<Container>, ContextError> {
    let entries: Vec<&JsonValue> = match value {
        JsonValue::Array(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut container = None;
    for entry in entries {
        match entry.as_str() {
            Some("@list") => container = Some(Container::List),
            Some("@set") => container = Some(Container::Set),
            Some(other) => {
                return Err(ContextError::Invalid(format!(
                    "unsupported @container '{other}' on term '{term}'"
                )));
            }
            None => {
                return Err(ContextError::Invalid(format!(
                    "@container of term '{term}' must be a string or array of strings"
                )));
            }
        }
    }
    Ok(container)
}

/// Resolves the IRI of a term declared in the current layer, chasing prefix
/// references through both the current layer and already resolved terms.
fn resolve_term_iri(
    term: &str,
    raw: &HashMap<&str, RawDef>,
    context: &ParsedJsonLdContext,
    depth: usize,
) -> Result<String, ContextError> {
    if depth > MAX_PREFIX_DEPTH {
        return Err(ContextError::Cyclic(term.to_owned()));
    }
    let value = match raw.get(term).and_then(|def| def.id.as_deref()) {
        Some(id) => id.to_owned(),
        // An object definition without @id falls back to the term name
        // itself, which then needs @vocab to become absolute.
        None => term.to_owned(),
    };
    expand_definition_value(&value, raw, context, depth)
}

/// Expands an IRI-valued entry of a term definition (its `@id` or `@type`).
fn expand_definition_value(
    value: &str,
    raw: &HashMap<&str, RawDef>,
    context: &ParsedJsonLdContext,
    depth: usize,
) -> Result<String, ContextError> {
    if depth > MAX_PREFIX_DEPTH {
        return Err(ContextError::Cyclic(value.to_owned()));
    }
    if value.starts_with('@') {
        return Ok(value.to_owned());
    }
    if let Some((prefix, suffix)) = value.split_once(':') {
        if raw.contains_key(prefix) {
            let prefix_iri = resolve_term_iri(prefix, raw, context, depth + 1)?;
            return Ok(format!("{prefix_iri}{suffix}"));
        }
        if let Some(def) = context.terms.get(prefix) {
            return Ok(format!("{}{suffix}", def.iri));
        }
        return Ok(value.to_owned());
    }
    if let Some(vocab) = &context.vocab {
        return Ok(format!("{vocab}{value}"));
    }
    Err(ContextError::Invalid(format!(
        "'{value}' is not an absolute IRI and no @vocab is declared"
    )))
}
