use std::fmt;

use super::value::Value;
use crate::frontend::decode::{is_symbol_line, quad_count};

/// Instruction header, identified purely by the number of symbol
/// quadruplets in its line.
///
/// The discriminant is the quadruplet count, so the table order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    // ────────────────────────────── Guards ──────────────────────────────
    /// `fard` x1. Introduces the operator of a While guard.
    Comparison = 1,
    /// `fard` x2. Reserved, stepped over.
    Boolean = 2,
    /// `fard` x3. Reserved, stepped over.
    Conditionals = 3,

    // ─────────────────────────────── Data ───────────────────────────────
    /// `fard` x4. Reserved for the future variable store, stepped over.
    Variables = 4,
    /// `fard` x5. Followed by one text data line.
    Ascii = 5,

    // ─────────────────────────── Control flow ───────────────────────────
    /// `fard` x6. Followed by a loop subtype line.
    Loops = 6,

    // ────────────────────────────── Numeric ─────────────────────────────
    /// `fard` x7. Followed by one base-4 number data line.
    Numbers = 7,
    /// `fard` x8. Reserved, stepped over.
    Arithmetic = 8,

    // ──────────────────────────────── I/O ───────────────────────────────
    /// `fard` x9. Followed by the text to print.
    Print = 9,
}

impl Header {
    pub const TABLE: [Header; 9] = [
        Header::Comparison,
        Header::Boolean,
        Header::Conditionals,
        Header::Variables,
        Header::Ascii,
        Header::Loops,
        Header::Numbers,
        Header::Arithmetic,
        Header::Print,
    ];

    /// Look up the header for a quadruplet count (1-based).
    pub fn from_reps(reps: usize) -> Option<Header> {
        reps.checked_sub(1)
            .and_then(|idx| Self::TABLE.get(idx))
            .copied()
    }

    /// Classify a source line.
    ///
    /// Returns `None` for data lines: anything empty, containing a
    /// non-alphabet symbol, not a multiple of 4 long, or longer than the
    /// table allows.
    pub fn classify(line: &str) -> Option<Header> {
        if !is_symbol_line(line) {
            return None;
        }
        quad_count(line).and_then(Self::from_reps)
    }

    pub fn reps(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Header::Comparison => "Comparison",
            Header::Boolean => "Boolean",
            Header::Conditionals => "Conditionals",
            Header::Variables => "Variables",
            Header::Ascii => "ASCII",
            Header::Loops => "Loops",
            Header::Numbers => "Numbers",
            Header::Arithmetic => "Arithmetic",
            Header::Print => "Print",
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subtype selected by the line after a `Loops` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    /// Reserved. Reaching it is a runtime error.
    For,
    End,
}

impl LoopKind {
    pub fn from_reps(reps: usize) -> Option<LoopKind> {
        match reps {
            1 => Some(LoopKind::While),
            2 => Some(LoopKind::For),
            3 => Some(LoopKind::End),
            _ => None,
        }
    }
}

/// Operator of a While guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
}

impl CompareOp {
    /// Counts outside 1..=4 fall back to `==`.
    pub fn from_reps(reps: usize) -> CompareOp {
        match reps {
            2 => CompareOp::NotEq,
            3 => CompareOp::Lt,
            4 => CompareOp::Gt,
            _ => CompareOp::Eq,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }

    /// Evaluate `left OP right`.
    ///
    /// Integers and text never compare equal. Ordering an integer against
    /// text has no answer and yields `None`.
    pub fn apply(self, left: &Value, right: &Value) -> Option<bool> {
        let ordering = match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        };

        match (self, ordering) {
            (CompareOp::Eq, ord) => Some(ord.is_some_and(|o| o.is_eq())),
            (CompareOp::NotEq, ord) => Some(!ord.is_some_and(|o| o.is_eq())),
            (CompareOp::Lt, ord) => ord.map(|o| o.is_lt()),
            (CompareOp::Gt, ord) => ord.map(|o| o.is_gt()),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn int(n: u32) -> Value {
        Value::Integer(BigUint::from(n))
    }

    #[test]
    fn test_classify_by_run_length() {
        assert_eq!(Header::classify("fard"), Some(Header::Comparison));
        assert_eq!(Header::classify(&"fard".repeat(5)), Some(Header::Ascii));
        assert_eq!(Header::classify(&"fard".repeat(6)), Some(Header::Loops));
        assert_eq!(Header::classify(&"fard".repeat(9)), Some(Header::Print));
    }

    #[test]
    fn test_classify_any_alphabet_symbols() {
        // Only the length matters, not which symbols make up the run.
        assert_eq!(Header::classify("dddd"), Some(Header::Comparison));
        assert_eq!(Header::classify("ffffaaaa"), Some(Header::Boolean));
        assert_eq!(Header::classify("  fardfard \t"), Some(Header::Boolean));
    }

    #[test]
    fn test_classify_rejects_data() {
        assert_eq!(Header::classify(""), None);
        assert_eq!(Header::classify("   "), None);
        assert_eq!(Header::classify("far"), None);
        assert_eq!(Header::classify("fardf"), None);
        assert_eq!(Header::classify("fxrd"), None);
        assert_eq!(Header::classify(&"fard".repeat(10)), None);
    }

    #[test]
    fn test_reps_matches_table() {
        for (i, header) in Header::TABLE.iter().enumerate() {
            assert_eq!(header.reps(), i + 1);
            assert_eq!(Header::from_reps(i + 1), Some(*header));
        }
        assert_eq!(Header::from_reps(0), None);
        assert_eq!(Header::from_reps(10), None);
    }

    #[test]
    fn test_loop_kind() {
        assert_eq!(LoopKind::from_reps(1), Some(LoopKind::While));
        assert_eq!(LoopKind::from_reps(2), Some(LoopKind::For));
        assert_eq!(LoopKind::from_reps(3), Some(LoopKind::End));
        assert_eq!(LoopKind::from_reps(4), None);
    }

    #[test]
    fn test_compare_op_mapping() {
        assert_eq!(CompareOp::from_reps(1), CompareOp::Eq);
        assert_eq!(CompareOp::from_reps(2), CompareOp::NotEq);
        assert_eq!(CompareOp::from_reps(3), CompareOp::Lt);
        assert_eq!(CompareOp::from_reps(4), CompareOp::Gt);
        assert_eq!(CompareOp::from_reps(7), CompareOp::Eq);
    }

    #[test]
    fn test_compare_integers() {
        assert_eq!(CompareOp::Eq.apply(&int(3), &int(3)), Some(true));
        assert_eq!(CompareOp::NotEq.apply(&int(3), &int(4)), Some(true));
        assert_eq!(CompareOp::Lt.apply(&int(3), &int(4)), Some(true));
        assert_eq!(CompareOp::Gt.apply(&int(3), &int(4)), Some(false));
    }

    #[test]
    fn test_compare_text_and_mixed() {
        let a = Value::Text("ab".to_string());
        let b = Value::Text("b".to_string());
        assert_eq!(CompareOp::Lt.apply(&a, &b), Some(true));
        assert_eq!(CompareOp::Eq.apply(&a, &int(1)), Some(false));
        assert_eq!(CompareOp::NotEq.apply(&a, &int(1)), Some(true));
        assert_eq!(CompareOp::Gt.apply(&a, &int(1)), None);
    }
}
