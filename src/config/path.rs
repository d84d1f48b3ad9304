//! Dotted-path addressing over a [`Table`].

use tracing::trace;

use super::value::{Table, Value};

/// Follows a dotted path from `root`.
///
/// Returns `None` as soon as a segment is missing or the current node is not
/// a table. The final node may be any value, including `Null`.
pub(crate) fn lookup<'a>(root: &'a Table, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = root.get(first)?;

    for segment in segments {
        current = current.as_table()?.get(segment)?;
    }

    Some(current)
}

/// Stores `value` at a dotted path, creating intermediate tables as needed.
///
/// An intermediate node that exists but is not a table is replaced by an
/// empty table; whatever it held is discarded.
pub(crate) fn assign(root: &mut Table, path: &str, value: Value) {
    let Some((parents, last)) = path.rsplit_once('.') else {
        root.insert(path.to_string(), value);
        return;
    };

    let mut node = root;
    for segment in parents.split('.') {
        let slot = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !slot.is_table() {
            trace!(path, segment, replaced = slot.type_str(), "replacing non-table node");
            *slot = Value::Table(Table::new());
        }
        let Value::Table(next) = slot else {
            return;
        };
        node = next;
    }

    node.insert(last.to_string(), value);
}
