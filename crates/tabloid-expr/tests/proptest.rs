//! Property-based tests for tabloid-expr using proptest.

use std::time::Duration;

use proptest::prelude::*;
use tabloid::{Row, Value};
use tabloid_expr::{parse_duration, ExprEvaluator};

// ============================================================================
// Test helpers
// ============================================================================

fn eval(expression: &str, pairs: &[(&str, &str)]) -> Value {
    let evaluator = ExprEvaluator::new();
    let program = evaluator.parse(expression).unwrap();
    evaluator
        .eval(&program, &Row::from_pairs(0, pairs.iter().copied()))
        .unwrap()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Compiling arbitrary text returns a result and never panics.
    #[test]
    fn parse_never_panics(input in "[ -~]{0,40}") {
        let _ = ExprEvaluator::new().parse(&input);
    }

    /// Any cell equals itself.
    #[test]
    fn cell_equals_itself(cell in "\\PC{0,20}") {
        let pairs = [("value", cell.as_str())];
        prop_assert_eq!(eval("value == value", &pairs), Value::Bool(true));
        prop_assert_eq!(eval("value != value", &pairs), Value::Bool(false));
    }

    /// Integer cells compare numerically, not as text.
    #[test]
    fn numeric_cells_order_numerically(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        let (a_text, b_text) = (a.to_string(), b.to_string());
        let pairs = [("a", a_text.as_str()), ("b", b_text.as_str())];
        prop_assert_eq!(eval("a < b", &pairs), Value::Bool(a < b));
        prop_assert_eq!(eval("a >= b", &pairs), Value::Bool(a >= b));
        prop_assert_eq!(eval("a == b", &pairs), Value::Bool(a == b));
    }

    /// `&&` and `||` agree with Rust's operators.
    #[test]
    fn logic_matches_rust(a: bool, b: bool) {
        let (a_text, b_text) = (if a { "y" } else { "n" }, if b { "y" } else { "n" });
        let pairs = [("a", a_text), ("b", b_text)];
        prop_assert_eq!(eval("a == 'y' && b == 'y'", &pairs), Value::Bool(a && b));
        prop_assert_eq!(eval("a == 'y' || b == 'y'", &pairs), Value::Bool(a || b));
        prop_assert_eq!(eval("!(a == 'y')", &pairs), Value::Bool(!a));
    }

    /// `isready` is true exactly when both sides of `m/n` agree.
    #[test]
    fn readiness(m in 0u32..20, n in 1u32..20) {
        let ready = format!("{m}/{n}");
        let pairs = [("ready", ready.as_str())];
        prop_assert_eq!(eval("isready(ready)", &pairs), Value::Bool(m == n));
        prop_assert_eq!(eval("isnotready(ready)", &pairs), Value::Bool(m != n));
    }

    /// Compound durations add up their parts.
    #[test]
    fn compound_durations(d in 0u64..400, h in 0u64..24, m in 0u64..60, s in 0u64..60) {
        let text = format!("{d}d{h}h{m}m{s}s");
        let expected = Duration::from_secs(((d * 24 + h) * 60 + m) * 60 + s);
        prop_assert_eq!(parse_duration(&text).unwrap(), expected);
    }

    /// Age comparisons agree with comparing seconds.
    #[test]
    fn age_comparisons(a in 0u64..100_000, b in 0u64..2_000) {
        let (age, limit) = (format!("{a}s"), format!("{b}m"));
        let pairs = [("age", age.as_str()), ("limit", limit.as_str())];
        let b = b * 60;
        prop_assert_eq!(eval("age.olderthan(limit)", &pairs), Value::Bool(a > b));
        prop_assert_eq!(eval("age.newerthan(limit)", &pairs), Value::Bool(a < b));
        prop_assert_eq!(eval("eqduration(age, limit)", &pairs), Value::Bool(a == b));
    }
}
