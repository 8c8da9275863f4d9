//! Helper functions callable from expressions.
//!
//! Every [`ExprEvaluator`](crate::ExprEvaluator) owns its own
//! [`FunctionRegistry`]. The built-in set targets `kubectl` output:
//!
//! | Function | True when |
//! |----------|-----------|
//! | `isready(s)` / `isnotready(s)` | `s` is `m/n` with `m == n` / `m != n` |
//! | `hasrestarts(s)` / `hasnorestarts(s)` | `s` starts with a positive restart count / does not |
//! | `olderthan(a, b)` | duration `a > b` |
//! | `olderthaneq(a, b)` | duration `a >= b` |
//! | `newerthan(a, b)` | duration `a < b` |
//! | `newerthaneq(a, b)` | duration `a <= b` |
//! | `eqduration(a, b)` | duration `a == b` |
//! | `isrunning(s)`, `ispending(s)`, `iscompleted(s)`, `isfailed(s)`, `isterminating(s)` | `s` is that status |
//!
//! Every function can also be called as a method on its first argument:
//! `age.olderthan("1d")` is `olderthan(age, "1d")`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tabloid::Value;

use crate::duration::parse_duration;
use crate::error::{ExprError, Result};

type Body = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A named function with a fixed number of arguments.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    body: Arc<Body>,
}

impl Function {
    /// Lowercase name the function is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Calls the function. The argument count is checked at compile time.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if args.len() != self.arity {
            return Err(ExprError::Arity {
                name: self.name.clone(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Functions visible to expressions, looked up case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in helpers.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register("isready", 1, |args| {
            Ok(Value::Bool(readiness("isready", &args[0])?))
        });
        registry.register("isnotready", 1, |args| {
            Ok(Value::Bool(!readiness("isnotready", &args[0])?))
        });

        registry.register("hasrestarts", 1, |args| {
            Ok(Value::Bool(has_restarts("hasrestarts", &args[0])?))
        });
        registry.register("hasnorestarts", 1, |args| {
            Ok(Value::Bool(!has_restarts("hasnorestarts", &args[0])?))
        });

        registry.register_duration("olderthan", |a, b| a > b);
        registry.register_duration("olderthaneq", |a, b| a >= b);
        registry.register_duration("newerthan", |a, b| a < b);
        registry.register_duration("newerthaneq", |a, b| a <= b);
        registry.register_duration("eqduration", |a, b| a == b);

        for (name, status) in [
            ("isrunning", "Running"),
            ("ispending", "Pending"),
            ("iscompleted", "Completed"),
            ("isfailed", "Failed"),
            ("isterminating", "Terminating"),
        ] {
            registry.register(name, 1, move |args| {
                Ok(Value::Bool(string_arg(name, &args[0])? == status))
            });
        }

        registry
    }

    /// Registers (or replaces) a function.
    ///
    /// # Example
    ///
    /// ```
    /// use tabloid::Value;
    /// use tabloid_expr::FunctionRegistry;
    ///
    /// let mut registry = FunctionRegistry::builtin();
    /// registry.register("isempty", 1, |args| {
    ///     Ok(Value::Bool(args[0].as_str().is_some_and(str::is_empty)))
    /// });
    /// assert!(registry.get("IsEmpty").is_some());
    /// ```
    pub fn register<F>(&mut self, name: &str, arity: usize, body: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.to_lowercase();
        self.functions.insert(
            name.clone(),
            Function {
                name,
                arity,
                body: Arc::new(body),
            },
        );
        self
    }

    fn register_duration(&mut self, name: &'static str, compare: fn(Duration, Duration) -> bool) {
        self.register(name, 2, move |args| {
            let a = parse_duration(string_arg(name, &args[0])?)?;
            let b = parse_duration(string_arg(name, &args[1])?)?;
            Ok(Value::Bool(compare(a, b)))
        });
    }

    /// Looks up a function by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions
            .get(name)
            .or_else(|| self.functions.get(&name.to_lowercase()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if no function is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn string_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ExprError::function(name, "only accepts string arguments"))
}

/// `m/n` → `m == n`.
fn readiness(name: &str, value: &Value) -> Result<bool> {
    let text = string_arg(name, value)?;
    let pieces: Vec<&str> = text.split('/').filter(|p| !p.is_empty()).collect();
    match pieces.as_slice() {
        [current, total] => Ok(current.trim() == total.trim()),
        _ => Err(ExprError::function(
            name,
            "only accepts string arguments in the form of <current>/<total>",
        )),
    }
}

/// Whether a `RESTARTS` cell such as `3` or `2 (5m ago)` starts with a
/// positive count. Cells without a count (`<none>`) have no restarts.
fn has_restarts(name: &str, value: &Value) -> Result<bool> {
    let text = string_arg(name, value)?;
    let count = text.split_whitespace().next().unwrap_or_default();
    Ok(!count.is_empty()
        && count.chars().all(|c| c.is_ascii_digit())
        && count.chars().any(|c| c != '0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[&str]) -> Result<Value> {
        let args: Vec<Value> = args.iter().map(|a| Value::from(*a)).collect();
        FunctionRegistry::builtin().get(name).unwrap().call(&args)
    }

    fn truth(name: &str, args: &[&str]) -> bool {
        call(name, args).unwrap().as_bool().unwrap()
    }

    #[test]
    fn builtin_names() {
        let registry = FunctionRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "eqduration",
                "hasnorestarts",
                "hasrestarts",
                "iscompleted",
                "isfailed",
                "isnotready",
                "ispending",
                "isready",
                "isrunning",
                "isterminating",
                "newerthan",
                "newerthaneq",
                "olderthan",
                "olderthaneq",
            ]
        );
    }

    #[test]
    fn isready() {
        assert!(truth("isready", &["1/1"]));
        assert!(truth("isready", &["3/3"]));
        assert!(!truth("isready", &["0/1"]));
        assert!(truth("isnotready", &["0/1"]));
        assert!(!truth("isnotready", &["2/2"]));
    }

    #[test]
    fn isready_rejects_malformed_input() {
        assert!(call("isready", &["1"]).is_err());
        assert!(call("isready", &["1/2/3"]).is_err());
        assert!(call("isnotready", &[""]).is_err());

        let err = FunctionRegistry::builtin()
            .get("isready")
            .unwrap()
            .call(&[Value::Number(1.0)])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "isready function only accepts string arguments"
        );
    }

    #[test]
    fn hasrestarts() {
        assert!(!truth("hasrestarts", &["0"]));
        assert!(truth("hasrestarts", &["1"]));
        assert!(truth("hasrestarts", &["12"]));
        assert!(truth("hasrestarts", &["1 (5s ago)"]));
        assert!(truth("hasnorestarts", &["0"]));
        assert!(!truth("hasnorestarts", &["4 (2d ago)"]));
        assert!(truth("hasrestarts", &["18446744073709551616"]));
    }

    #[test]
    fn cells_without_a_count_have_no_restarts() {
        for cell in ["<none>", "", "   ", "3d", "-1"] {
            assert!(!truth("hasrestarts", &[cell]), "hasrestarts({cell:?})");
            assert!(truth("hasnorestarts", &[cell]), "hasnorestarts({cell:?})");
        }

        let err = FunctionRegistry::builtin()
            .get("hasrestarts")
            .unwrap()
            .call(&[Value::Number(3.0)])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "hasrestarts function only accepts string arguments"
        );
    }

    #[test]
    fn durations() {
        let cases = [
            // a, b, older, older_eq, newer, newer_eq, equal
            ("3h", "1h", true, true, false, false, false),
            ("1h", "3h", false, false, true, true, false),
            ("1h", "1h", false, true, false, true, true),
            ("1d", "24h", false, true, false, true, true),
            ("2w", "13d", true, true, false, false, false),
        ];

        for (a, b, older, older_eq, newer, newer_eq, equal) in cases {
            assert_eq!(truth("olderthan", &[a, b]), older, "olderthan({a}, {b})");
            assert_eq!(truth("olderthaneq", &[a, b]), older_eq, "olderthaneq({a}, {b})");
            assert_eq!(truth("newerthan", &[a, b]), newer, "newerthan({a}, {b})");
            assert_eq!(truth("newerthaneq", &[a, b]), newer_eq, "newerthaneq({a}, {b})");
            assert_eq!(truth("eqduration", &[a, b]), equal, "eqduration({a}, {b})");
        }
    }

    #[test]
    fn durations_reject_bad_input() {
        assert!(call("olderthan", &["1", "1h"]).is_err());
        assert!(call("olderthan", &["1h", "1"]).is_err());
        assert!(call("newerthan", &["soon", "1h"]).is_err());
    }

    #[test]
    fn status_family() {
        assert!(truth("isrunning", &["Running"]));
        assert!(!truth("isrunning", &["running"]));
        assert!(truth("isfailed", &["Failed"]));
        assert!(truth("ispending", &["Pending"]));
        assert!(truth("iscompleted", &["Completed"]));
        assert!(truth("isterminating", &["Terminating"]));
        assert!(!truth("isterminating", &[""]));
    }

    #[test]
    fn arity_is_checked_on_call() {
        let registry = FunctionRegistry::builtin();
        let err = registry
            .get("isready")
            .unwrap()
            .call(&[Value::from("1/1"), Value::from("2/2")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "isready function only accepts 1 argument(s), got 2"
        );
    }

    #[test]
    fn custom_functions_and_case_insensitive_lookup() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());

        registry.register("Shout", 1, |args| {
            Ok(Value::String(args[0].as_str().unwrap_or_default().to_uppercase()))
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("SHOUT").unwrap().name(), "shout");
        assert_eq!(
            registry.get("shout").unwrap().call(&[Value::from("hi")]).unwrap(),
            Value::from("HI")
        );
    }

    #[test]
    fn registries_are_independent() {
        let mut one = FunctionRegistry::builtin();
        let two = FunctionRegistry::builtin();
        one.register("extra", 0, |_| Ok(Value::Bool(true)));
        assert!(one.get("extra").is_some());
        assert!(two.get("extra").is_none());
    }
}
