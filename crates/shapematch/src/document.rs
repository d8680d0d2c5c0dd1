//! JSON case documents.
//!
//! A document carries a subject and an ordered list of cases:
//!
//! ```json
//! {
//!   "subject": {"status": "error", "error": "boom"},
//!   "cases": [
//!     {"kind": "with", "pattern": {"status": "error", "error": {"$select": "error"}}},
//!     {"kind": "otherwise", "then": "nothing"}
//!   ]
//! }
//! ```
//!
//! # Pattern encoding
//!
//! JSON primitives are literals, arrays are tuples and objects are object
//! shapes. An object whose keys all start with `$` is a matcher instead:
//!
//! | Matcher                         | Pattern                                |
//! |---------------------------------|----------------------------------------|
//! | `{"$any": true}`                | wildcard                               |
//! | `{"$select": "name"}`           | named selection (`null` = anonymous)   |
//! | `{"$select": .., "$in": p}`     | selection constrained by `p`           |
//! | `{"$not": p}`                   | negation                               |
//! | `{"$and": [..]}` / `{"$or": [..]}` | conjunction / alternatives          |
//! | `{"$optional": p}`              | `undefined` or `p`                     |
//! | `{"$array": p}`                 | every element matches `p`              |
//! | `{"$kind": "string"}`           | any value of that kind, or `"nullish"` |
//!
//! Guards and predicates are patterns too: a guard passes when its pattern
//! matches the subject.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use shapematch_eval::{Case, CaseBuilder, CaseKind, EvaluationState, MatchConfig};
use shapematch_patterns::{MatchError, Pattern, Predicate, SelectionKey};
use shapematch_value::ValueKind;
use thiserror::Error;

use crate::json::{from_json, to_json};

/// Failure to load or evaluate a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed case document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid pattern in case `{case}`: {reason}")]
    InvalidPattern { case: String, reason: String },
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// The declarative form of a case in a document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKindSpec {
    With,
    When,
    Otherwise,
}

impl From<CaseKindSpec> for CaseKind {
    fn from(kind: CaseKindSpec) -> Self {
        match kind {
            CaseKindSpec::With => CaseKind::With,
            CaseKindSpec::When => CaseKind::When,
            CaseKindSpec::Otherwise => CaseKind::Otherwise,
        }
    }
}

/// One case as written in a document.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseSpec {
    pub kind: CaseKindSpec,
    /// Identity key; defaults to the case's position.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub pattern: Option<serde_json::Value>,
    /// Further alternatives after `pattern`.
    #[serde(default)]
    pub patterns: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "present")]
    pub guard: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "present")]
    pub predicate: Option<serde_json::Value>,
    /// Constant result. Without it the case yields its selections.
    #[serde(default, deserialize_with = "present")]
    pub then: Option<serde_json::Value>,
}

/// A subject plus the cases to evaluate against it.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDocument {
    /// Absent means `undefined`; `null` means null.
    #[serde(default, deserialize_with = "present")]
    pub subject: Option<serde_json::Value>,
    #[serde(default)]
    pub exhaustive: bool,
    #[serde(default)]
    pub strict_selections: bool,
    pub cases: Vec<CaseSpec>,
}

/// Keeps an explicit `null` distinct from a missing field.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl CaseDocument {
    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn config(&self) -> MatchConfig {
        MatchConfig::default()
            .exhaustive(self.exhaustive)
            .strict_selections(self.strict_selections)
    }

    /// Build an evaluation state holding the subject and every case.
    #[tracing::instrument(level = "debug", skip_all, fields(cases = self.cases.len()))]
    pub fn build_state(&self) -> Result<EvaluationState<serde_json::Value>, DocumentError> {
        let mut state = EvaluationState::with_config(self.config());
        for (position, spec) in self.cases.iter().enumerate() {
            let key = spec.id.clone().unwrap_or_else(|| position.to_string());
            state.register(build_case(spec, key)?)?;
        }
        if let Some(subject) = &self.subject {
            state.set_subject(from_json(subject))?;
        }
        Ok(state)
    }

    /// Evaluate the document: the winning case's output, or `null`.
    pub fn evaluate(&self) -> Result<serde_json::Value, DocumentError> {
        let output = self.build_state()?.evaluate()?;
        Ok(output.unwrap_or(serde_json::Value::Null))
    }
}

fn build_case(spec: &CaseSpec, key: String) -> Result<Case<serde_json::Value>, DocumentError> {
    let kind = CaseKind::from(spec.kind);
    let case_name = format!("{kind}.{key}");
    let invalid = |reason: String| DocumentError::InvalidPattern {
        case: case_name.clone(),
        reason,
    };

    let mut builder = match kind {
        CaseKind::With => CaseBuilder::with(key),
        CaseKind::When => CaseBuilder::when(key),
        CaseKind::Otherwise => CaseBuilder::otherwise(key),
    };

    for json in spec.pattern.iter().chain(&spec.patterns) {
        builder = builder.pattern(decode_pattern(json).map_err(invalid)?);
    }
    for json in spec.guard.iter().chain(&spec.predicate) {
        let pattern = decode_pattern(json).map_err(invalid)?;
        builder = builder.guard_predicate(Predicate::new(move |value| pattern.matches(value)));
    }
    builder = match &spec.then {
        Some(output) => builder.then(output.clone()),
        None => builder.handler(|selections, subject| to_json(&selections.argument(subject))),
    };
    Ok(builder.build()?)
}

/// Decode the JSON encoding of a pattern.
pub fn decode_pattern(json: &serde_json::Value) -> Result<Pattern, String> {
    match json {
        serde_json::Value::Array(items) => items
            .iter()
            .map(decode_pattern)
            .collect::<Result<Vec<_>, _>>()
            .map(Pattern::tuple),
        serde_json::Value::Object(props)
            if !props.is_empty() && props.keys().all(|k| k.starts_with('$')) =>
        {
            decode_matcher(props)
        }
        serde_json::Value::Object(props) => props
            .iter()
            .map(|(key, field)| decode_pattern(field).map(|p| (key.as_str(), p)))
            .collect::<Result<Vec<_>, _>>()
            .map(Pattern::object),
        primitive => Ok(Pattern::literal(from_json(primitive))),
    }
}

fn decode_matcher(props: &serde_json::Map<String, serde_json::Value>) -> Result<Pattern, String> {
    let (name, arg) = match props.iter().find(|(k, _)| k.as_str() != "$in") {
        Some(entry) => entry,
        None => return Err("`$in` is only valid next to `$select`".to_string()),
    };
    let inner = props.get("$in");
    if props.len() != 1 && !(name == "$select" && inner.is_some() && props.len() == 2) {
        return Err(format!("matcher `{name}` takes no other keys"));
    }

    let list = |arg: &serde_json::Value| -> Result<Vec<Pattern>, String> {
        match arg {
            serde_json::Value::Array(items) => items.iter().map(decode_pattern).collect(),
            _ => Err(format!("`{name}` expects an array of patterns")),
        }
    };

    match name.as_str() {
        "$any" => match arg {
            serde_json::Value::Bool(true) => Ok(Pattern::Wildcard),
            _ => Err("`$any` expects `true`".to_string()),
        },
        "$select" => {
            let key = match arg {
                serde_json::Value::String(name) => SelectionKey::named(name),
                serde_json::Value::Null | serde_json::Value::Bool(true) => SelectionKey::Anonymous,
                _ => return Err("`$select` expects a name, `null` or `true`".to_string()),
            };
            let pattern = inner.map(decode_pattern).transpose()?.map(Box::new);
            Ok(Pattern::Select { key, pattern })
        }
        "$not" => decode_pattern(arg).map(Pattern::not),
        "$and" => list(arg).map(Pattern::and),
        "$or" => list(arg).map(Pattern::or),
        "$optional" => decode_pattern(arg).map(Pattern::optional),
        "$array" => decode_pattern(arg).map(Pattern::each),
        "$kind" => match arg.as_str() {
            Some("nullish") => Ok(Pattern::nullish()),
            Some(kind) => ValueKind::from_name(kind)
                .map(Pattern::kind)
                .ok_or_else(|| format!("unknown kind `{kind}`")),
            None => Err("`$kind` expects a kind name".to_string()),
        },
        other => Err(format!("unknown matcher `{other}`")),
    }
}
