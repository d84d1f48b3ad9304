//! Constant placeholder substitution for configuration values.
//!
//! A placeholder is `${NAME}` where `NAME` contains no `{` or `}`. Each
//! placeholder whose name the registry defines is replaced by the constant's
//! text; all others are left in place, delimiters included. Substitution is a
//! single left-to-right pass, so replacement text is never rescanned.

use std::borrow::Cow;

use tracing::trace;

use super::registry::ConstantRegistry;
use super::value::{Table, Value};

/// Substitutes placeholders in a found value.
///
/// Only a string is inspected. Tables and arrays come back as they are, and
/// so do strings nested inside them.
pub(crate) fn resolve_value<'a, R>(value: &'a Value, registry: &R) -> Cow<'a, Value>
where
    R: ConstantRegistry + ?Sized,
{
    match value {
        Value::String(s) => match substitute_constants(s, registry) {
            Cow::Borrowed(_) => Cow::Borrowed(value),
            Cow::Owned(resolved) => Cow::Owned(Value::String(resolved)),
        },
        other => Cow::Borrowed(other),
    }
}

/// Copies a tree with placeholders substituted in every string leaf,
/// including strings inside arrays and nested tables.
pub(crate) fn resolve_tree<R>(table: &Table, registry: &R) -> Table
where
    R: ConstantRegistry + ?Sized,
{
    table
        .iter()
        .map(|(key, value)| (key.clone(), resolve_deep(value, registry)))
        .collect()
}

fn resolve_deep<R>(value: &Value, registry: &R) -> Value
where
    R: ConstantRegistry + ?Sized,
{
    match value {
        Value::String(s) => Value::String(substitute_constants(s, registry).into_owned()),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_deep(item, registry))
                .collect(),
        ),
        Value::Table(t) => Value::Table(resolve_tree(t, registry)),
        other => other.clone(),
    }
}

/// Replaces every defined `${NAME}` in `input`.
///
/// Borrows `input` back when nothing was replaced.
pub(crate) fn substitute_constants<'a, R>(input: &'a str, registry: &R) -> Cow<'a, str>
where
    R: ConstantRegistry + ?Sized,
{
    let mut output: Option<String> = None;
    // Bytes of `input` before this index are already in `output`.
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find("${") {
        let start = cursor + offset;
        let name_start = start + 2;

        let Some(len) = placeholder_name_len(&input[name_start..]) else {
            // Not a placeholder here; a later `${` may still be one.
            cursor = start + 1;
            continue;
        };

        let end = name_start + len;
        let name = &input[name_start..end];
        match registry.constant(name) {
            Some(constant) => {
                let out = output.get_or_insert_with(|| String::with_capacity(input.len()));
                out.push_str(&input[copied..start]);
                out.push_str(&constant);
                copied = end + 1;
            }
            None => trace!(name, "placeholder left unresolved"),
        }
        cursor = end + 1;
    }

    match output {
        Some(mut out) => {
            out.push_str(&input[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(input),
    }
}

/// Length of the name before the closing `}`, or `None` if a `{` or the end
/// of input comes first.
fn placeholder_name_len(rest: &str) -> Option<usize> {
    for (index, byte) in rest.bytes().enumerate() {
        match byte {
            b'}' => return Some(index),
            b'{' => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Constants;

    fn registry() -> Constants {
        let mut constants = Constants::new();
        constants.define("FOO", "bar");
        constants.define("VERSION", "1.4.2");
        constants.define("PORT", 8080);
        constants
    }

    #[test]
    fn test_simple_constant() {
        assert_eq!(
            substitute_constants("pre-${FOO}-post", &registry()),
            "pre-bar-post"
        );
    }

    #[test]
    fn test_multiple_constants() {
        assert_eq!(
            substitute_constants("v${VERSION} on :${PORT}", &registry()),
            "v1.4.2 on :8080"
        );
    }

    #[test]
    fn test_unresolved_placeholder_passes_through() {
        assert_eq!(substitute_constants("${BAZ}", &registry()), "${BAZ}");
        assert_eq!(
            substitute_constants("${FOO}/${BAZ}/${FOO}", &registry()),
            "bar/${BAZ}/bar"
        );
    }

    #[test]
    fn test_no_placeholder_borrows() {
        let result = substitute_constants("plain text $ { }", &registry());
        assert!(matches!(result, Cow::Borrowed("plain text $ { }")));

        let result = substitute_constants("${BAZ}", &registry());
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_malformed_placeholders_are_ignored() {
        let reg = registry();
        assert_eq!(substitute_constants("${FOO", &reg), "${FOO");
        assert_eq!(substitute_constants("$FOO}", &reg), "$FOO}");
        assert_eq!(substitute_constants("${{FOO}}", &reg), "${{FOO}}");
    }

    #[test]
    fn test_inner_placeholder_after_broken_outer() {
        assert_eq!(substitute_constants("${a${FOO}}", &registry()), "${abar}");
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let mut constants = Constants::new();
        constants.define("OUTER", "${INNER}");
        constants.define("INNER", "deep");
        assert_eq!(substitute_constants("${OUTER}", &constants), "${INNER}");
    }

    #[test]
    fn test_multibyte_text_around_placeholder() {
        assert_eq!(
            substitute_constants("héllo ${FOO} wörld", &registry()),
            "héllo bar wörld"
        );
    }

    #[test]
    fn test_resolve_value_skips_non_strings() {
        let reg = registry();
        let nested = Value::from(["${FOO}"]);
        assert!(matches!(resolve_value(&nested, &reg), Cow::Borrowed(v) if *v == nested));

        let number = Value::from(3);
        assert_eq!(resolve_value(&number, &reg).into_owned(), number);
    }

    #[test]
    fn test_resolve_tree_reaches_nested_strings() {
        let table = crate::config::from_toml_table(
            toml::from_str(
                r#"
                name = "app-${VERSION}"
                tags = ["${FOO}", "x"]

                [server]
                bind = "0.0.0.0:${PORT}"
                "#,
            )
            .unwrap(),
        );

        let resolved = resolve_tree(&table, &registry());
        assert_eq!(resolved["name"], Value::from("app-1.4.2"));
        assert_eq!(resolved["tags"], Value::from(["bar", "x"]));
        assert_eq!(
            resolved["server"].as_table().unwrap()["bind"],
            Value::from("0.0.0.0:8080")
        );
    }
}
