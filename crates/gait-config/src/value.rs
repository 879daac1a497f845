//! Typed config values

use serde_json::{Map, Number};
use std::fmt;

/// A literal config value.
///
/// Dict entries keep their textual order. Keys are scalars (string,
/// number or bool); the literal parser refuses anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Name of the variant, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Tuple(_) | Value::Dict(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and ints widened to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a list or a tuple.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a string key in a dict value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Whether the value can be written as a literal and read back.
    pub(crate) fn check_representable(&self) -> Result<(), String> {
        match self {
            Value::Float(f) if f.is_nan() => Err("NaN cannot be written as a literal".into()),
            Value::List(items) | Value::Tuple(items) => {
                items.iter().try_for_each(Value::check_representable)
            }
            Value::Dict(entries) => entries.iter().enumerate().try_for_each(|(idx, (k, v))| {
                if k.is_container() {
                    return Err(format!("{} is not a valid dict key", k.type_name()));
                }
                // Reading the literal back keeps only the last of equal keys.
                if entries[..idx].iter().any(|(earlier, _)| earlier == k) {
                    return Err(format!("duplicate dict key {k}"));
                }
                k.check_representable()?;
                v.check_representable()
            }),
            _ => Ok(()),
        }
    }

    /// Canonical single-line literal for this value.
    ///
    /// # Example
    /// ```
    /// use gait_config::Value;
    ///
    /// let v = Value::Dict(vec![(Value::from("R"), Value::from(vec![1, 2]))]);
    /// assert_eq!(v.to_literal(), "{'R': [1, 2]}");
    /// assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_literal(), "(1,)");
    /// ```
    pub fn to_literal(&self) -> String {
        let mut out = String::new();
        self.write_literal(&mut out);
        out
    }

    fn write_literal(&self, out: &mut String) {
        match self {
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&float_literal(*f)),
            Value::String(s) => out.push_str(&quote_str(s)),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::List(items) => {
                out.push('[');
                write_seq(items, out);
                out.push(']');
            }
            Value::Tuple(items) => {
                out.push('(');
                write_seq(items, out);
                if items.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            Value::Dict(entries) => {
                out.push('{');
                for (idx, (k, v)) in entries.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    k.write_literal(out);
                    out.push_str(": ");
                    v.write_literal(out);
                }
                out.push('}');
            }
        }
    }

    /// Converts to JSON. Dict keys become strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::Value::Number(Number::from(*i)),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) | Value::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Dict(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(json_key(k), v.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

fn write_seq(items: &[Value], out: &mut String) {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        item.write_literal(out);
    }
}

fn json_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        other => other.to_literal(),
    }
}

pub(crate) fn float_literal(f: f64) -> String {
    if f.is_infinite() {
        // Overflows back to infinity when parsed.
        return if f > 0.0 { "1e999".into() } else { "-1e999".into() };
    }
    format!("{f:?}")
}

/// Quotes a string the way the literal parser reads it back.
pub(crate) fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_literals() {
        assert_eq!(Value::Int(-3).to_literal(), "-3");
        assert_eq!(Value::Float(1.0).to_literal(), "1.0");
        assert_eq!(Value::Float(0.3).to_literal(), "0.3");
        assert_eq!(Value::Bool(true).to_literal(), "True");
        assert_eq!(Value::from("C:/Vicon").to_literal(), "'C:/Vicon'");
    }

    #[test]
    fn test_infinite_float_literal() {
        assert_eq!(Value::Float(f64::INFINITY).to_literal(), "1e999");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_literal(), "-1e999");
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(quote_str("it's"), "\"it's\"");
        assert_eq!(quote_str("say \"hi\" it's"), "'say \"hi\" it\\'s'");
        assert_eq!(quote_str("a\\b\n"), "'a\\\\b\\n'");
        assert_eq!(quote_str("\u{7}"), "'\\x07'");
    }

    #[test]
    fn test_container_literals() {
        assert_eq!(Value::Tuple(vec![]).to_literal(), "()");
        assert_eq!(
            Value::Tuple(vec![Value::Int(1), Value::Int(2)]).to_literal(),
            "(1, 2)"
        );
        assert_eq!(Value::List(vec![]).to_literal(), "[]");
        assert_eq!(Value::Dict(vec![]).to_literal(), "{}");
    }

    #[test]
    fn test_accessors() {
        let v = Value::Dict(vec![
            (Value::from("R"), Value::from("lawngreen")),
            (Value::Int(1), Value::Bool(false)),
        ]);
        assert_eq!(v.get("R").and_then(Value::as_str), Some("lawngreen"));
        assert_eq!(v.get("L"), None);
        assert_eq!(Value::Int(2).as_float(), Some(2.0));
        assert_eq!(Value::Int(2).as_str(), None);
        assert_eq!(
            Value::Tuple(vec![Value::Int(1)]).as_list(),
            Some(&[Value::Int(1)][..])
        );
    }

    #[test]
    fn test_representable() {
        assert!(Value::List(vec![Value::Float(f64::NAN)])
            .check_representable()
            .is_err());
        assert!(Value::Dict(vec![(Value::List(vec![]), Value::Int(1))])
            .check_representable()
            .is_err());
        assert!(Value::Float(f64::INFINITY).check_representable().is_ok());
    }

    #[test]
    fn test_duplicate_dict_keys_not_representable() {
        let dup = Value::Dict(vec![
            (Value::from("a"), Value::Int(1)),
            (Value::from("a"), Value::Int(2)),
        ]);
        assert_eq!(
            dup.check_representable(),
            Err("duplicate dict key 'a'".to_string())
        );
        let nested = Value::List(vec![Value::Dict(vec![
            (Value::Float(0.0), Value::Int(1)),
            (Value::Float(-0.0), Value::Int(2)),
        ])]);
        assert!(nested.check_representable().is_err());
        let distinct = Value::Dict(vec![
            (Value::Int(1), Value::Int(1)),
            (Value::from("1"), Value::Int(2)),
        ]);
        assert!(distinct.check_representable().is_ok());
    }

    #[test]
    fn test_to_json() {
        let v = Value::Dict(vec![
            (Value::Int(1), Value::Tuple(vec![Value::Float(0.5), Value::Bool(true)])),
            (Value::from("name"), Value::from("x")),
        ]);
        assert_eq!(v.to_json(), json!({"1": [0.5, true], "name": "x"}));
    }
}
