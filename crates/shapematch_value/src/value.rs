//! Runtime values matched by patterns.
//!
//! # Heap Enforcement
//!
//! Strings, arrays and objects live behind `Heap<T>`, whose constructor is
//! private to this module. Every heap value is therefore created through a
//! factory method on `Value`, which keeps identity (`Heap::ptr_eq`) meaningful:
//! two values are the same object only if one was cloned from the other.
//!
//! ```text
//! let s = Value::string("hello");                  // OK
//! let xs = Value::array(vec![Value::from(1)]);     // OK
//! let o = Value::object([("status", Value::from("idle"))]); // OK
//! let bad = Value::Str(Heap::new(..));             // ERROR: Heap::new is private
//! ```

mod heap;
mod kind;

use std::fmt;

use rustc_hash::FxHashMap;

pub use heap::Heap;
pub use kind::ValueKind;

/// Property table of an object value.
pub type Object = FxHashMap<String, Value>;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    // Primitives (inline, no heap allocation)
    /// Absent value. Also what a missing property reads as.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Double precision number.
    Number(f64),

    // Heap Types (identity-bearing)
    /// String value.
    Str(Heap<String>),
    /// Ordered sequence of values.
    Array(Heap<Vec<Value>>),
    /// Property bag keyed by string.
    Object(Heap<Object>),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    /// Create a number value.
    #[inline]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create an array value.
    ///
    /// Each call allocates a fresh identity, even for equal contents.
    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    /// Create an object value from key/value pairs.
    ///
    /// Later pairs overwrite earlier ones with the same key.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let props: Object = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(Heap::new(props))
    }

    /// Create an object value from an already built property table.
    #[inline]
    pub fn from_props(props: Object) -> Self {
        Value::Object(Heap::new(props))
    }
}

// Value Methods

impl Value {
    /// The coarse kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::Str(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Get the type name for messages and logs.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// `true` for `Undefined`.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `true` for `Undefined` and `Null`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Try to convert to a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to convert to a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to view as an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to view as an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(props) => Some(props),
            _ => None,
        }
    }

    /// Look up an own property.
    ///
    /// Returns `None` when `self` is not an object or the key is absent.
    /// A present key holding `Undefined` returns `Some(&Value::Undefined)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|props| props.get(key))
    }

    /// Strict equality (`===`).
    ///
    /// Primitives compare by value: `NaN` equals nothing, `+0` equals `-0`.
    /// Strings compare by content. Arrays and objects compare by identity.
    #[allow(clippy::float_cmp, reason = "IEEE equality is the intended semantics")]
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a.as_str() == b.as_str(),
            (Value::Array(a), Value::Array(b)) => Heap::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

// Trait Implementations

/// Structural equality. Heap values compare by content, not identity.
impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "IEEE equality is the intended semantics")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Heap::ptr_eq(a, b) || a == b,
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({:?})", s.as_str()),
            Value::Array(items) => write!(f, "Array({:?})", &**items),
            Value::Object(props) => {
                let mut entries: Vec<_> = props.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                f.debug_map().entries(entries).finish()
            }
        }
    }
}

/// Renders in a JavaScript-like notation with object keys sorted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_infinite() => {
                if n.is_sign_positive() {
                    write!(f, "Infinity")
                } else {
                    write!(f, "-Infinity")
                }
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(props) => {
                let mut keys: Vec<_> = props.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {key}: {}", props[key])?;
                }
                if props.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
        }
    }
}
