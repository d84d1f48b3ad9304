//! Merge-combine of two trees.
//!
//! Unlike an overlay merge, a key present on both sides never loses a value:
//! two tables merge recursively, any other pair is combined into an array
//! holding the left values followed by the right values.

use super::value::{Table, Value};

pub(crate) fn merge_tables(base: &mut Table, other: Table) {
    for (key, value) in other {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(other_table)) => {
                merge_tables(base_table, other_table);
            }
            (Some(existing), value) => {
                let left = std::mem::take(existing);
                *existing = combine(left, value);
            }
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Combines two colliding values that are not both tables.
///
/// Arrays are spliced rather than nested. `Null` is kept like any other
/// scalar.
fn combine(left: Value, right: Value) -> Value {
    let mut items = Vec::new();
    push_flat(&mut items, left);
    push_flat(&mut items, right);
    Value::Array(items)
}

fn push_flat(items: &mut Vec<Value>, value: Value) {
    match value {
        Value::Array(values) => items.extend(values),
        other => items.push(other),
    }
}
