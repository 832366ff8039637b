use num_bigint::BigUint;

/// Runtime value produced by decoding a data line.
///
/// Values only ever appear as While guard operands and as printed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Non-negative integer of any size, decoded from base-4 digits.
    Integer(BigUint),

    /// Text, one character per 4-symbol group.
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Text(_) => "Text",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(BigUint::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
