use std::fmt::Display;

use crate::symbols::symbols::TypeSymbol;

/// A runtime value. The variant always agrees with the static type the
/// binder gave the expression that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
}

impl Value {
    pub fn ty(&self) -> TypeSymbol {
        match self {
            Value::Int(_) => TypeSymbol::Int,
            Value::Float(_) => TypeSymbol::Float,
            Value::Double(_) => TypeSymbol::Double,
            Value::Bool(_) => TypeSymbol::Bool,
            Value::String(_) => TypeSymbol::String,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(value) => *value,
            other => panic!("expected a bool value, found {:?}", other),
        }
    }

    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(value) => *value,
            other => panic!("expected an int value, found {:?}", other),
        }
    }

    pub fn as_float(&self) -> f32 {
        match self {
            Value::Float(value) => *value,
            other => panic!("expected a float value, found {:?}", other),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Value::String(value) => value,
            other => panic!("expected a string value, found {:?}", other),
        }
    }

    /// Source text that lexes back to this literal.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Int(value) => value.to_string(),
            Value::Float(value) => format!("{}f", positional(value.to_string())),
            Value::Double(value) => positional(value.to_string()),
            Value::Bool(value) => value.to_string(),
            Value::String(value) => format!("\"{}\"", value.replace('"', "\"\"")),
        }
    }
}

/// `Display` for floats never uses an exponent but drops `.0` on whole
/// numbers, which would lex back as an int.
fn positional(mut text: String) -> String {
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::symbols::symbols::TypeSymbol;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::Int(1).ty(), TypeSymbol::Int);
        assert_eq!(Value::Float(1.0).ty(), TypeSymbol::Float);
        assert_eq!(Value::Double(1.0).ty(), TypeSymbol::Double);
        assert_eq!(Value::Bool(true).ty(), TypeSymbol::Bool);
        assert_eq!(Value::from("a").ty(), TypeSymbol::String);
    }

    #[test]
    fn test_float_literals_never_use_an_exponent() {
        assert_eq!(Value::Double(1e20).to_literal(), "100000000000000000000.0");
        assert_eq!(Value::Float(1e20).to_literal(), "100000000000000000000.0f");
        assert_eq!(Value::Double(1e-7).to_literal(), "0.0000001");
        assert_eq!(Value::Double(2.0).to_literal(), "2.0");
        assert_eq!(Value::Float(1.5).to_literal(), "1.5f");
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(Value::Int(42).to_literal(), "42");
        assert_eq!(Value::Float(2.0).to_literal(), "2.0f");
        assert_eq!(Value::Double(1.5).to_literal(), "1.5");
        assert_eq!(Value::Bool(false).to_literal(), "false");
        assert_eq!(Value::from("say \"hi\"").to_literal(), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }
}
