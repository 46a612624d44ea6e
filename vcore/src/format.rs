// VecDocs — format.rs
// Shapes query and search results into the JSON the examples print.
// Author: d65v <https://github.com/d65v>

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{json, Map, Value};

use crate::data::{f32_value, Column, ResultSet, SearchResult};
use crate::Result;

/// Flatten a column into JSON scalars by its type.
///
/// Float32 values keep their shortest decimal form. A dynamic column
/// yields the value stored under its key, and the `$meta` column yields
/// the whole dynamic object.
pub fn column_values(column: &Column) -> Vec<Value> {
    (0..column.len()).filter_map(|i| column.get(i)).collect()
}

/// Field-major (`[{"name": [v, ..]}, ..]`) or row-major
/// (`[{"name": v, ..}, ..]`) view of a set of columns.
///
/// Field-major output reports an empty column as `null`.
pub fn fields_to_json(columns: &[Column], in_fields: bool) -> Vec<Value> {
    let mut fields = Vec::with_capacity(columns.len());
    let mut rows: Vec<Map<String, Value>> = Vec::new();

    for column in columns {
        let values = column_values(column);

        for (i, v) in values.iter().enumerate() {
            if rows.len() < i + 1 {
                rows.push(Map::new());
            }
            rows[i].insert(column.name.clone(), v.clone());
        }

        let mut field = Map::new();
        let values = if values.is_empty() {
            Value::Null
        } else {
            Value::Array(values)
        };
        field.insert(column.name.clone(), values);
        fields.push(Value::Object(field));
    }

    if in_fields {
        fields
    } else {
        rows.into_iter().map(Value::Object).collect()
    }
}

/// One-line JSON for a query result set.
pub fn result_set_to_json(result_set: &ResultSet, in_fields: bool) -> String {
    Value::Array(fields_to_json(result_set, in_fields)).to_string()
}

/// One-line JSON for search results:
/// `[{"counts": n, "distances": [..], "rows": [..]}, ..]`, one object per
/// query vector, each carrying only its own hits.
pub fn results_to_json(results: &[SearchResult]) -> String {
    let out: Vec<Value> = results
        .iter()
        .map(|r| {
            json!({
                "counts": r.result_count,
                "distances": r.scores.iter().map(|s| f32_value(*s)).collect::<Vec<_>>(),
                "rows": fields_to_json(&r.fields, false),
            })
        })
        .collect();
    Value::Array(out).to_string()
}

/// Truncate every array in `value` to `max` items, appending a
/// `"(N more items hidden)"` marker where items were dropped.
pub fn reduce_array_length(value: Value, max: usize) -> Value {
    match value {
        Value::Array(items) => {
            let hidden = items.len().saturating_sub(max);
            let mut kept: Vec<Value> = items
                .into_iter()
                .take(max)
                .map(|v| reduce_array_length(v, max))
                .collect();
            if hidden > 0 {
                kept.push(Value::String(format!("({} more items hidden)", hidden)));
            }
            Value::Array(kept)
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, reduce_array_length(v, max)))
                .collect(),
        ),
        other => other,
    }
}

/// Re-indent a one-line JSON document, optionally truncating arrays.
pub fn pretty(line: &str, indent: &str, max_items: Option<usize>) -> Result<String> {
    let mut value: Value = serde_json::from_str(line.trim())?;
    if let Some(max) = max_items {
        value = reduce_array_length(value, max);
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnData, PrimaryKey};

    fn columns() -> Vec<Column> {
        vec![
            Column::int64("id", vec![1, 2]),
            Column::dynamic("color", vec![json!("red_7025"), json!("pink_9298")]),
        ]
    }

    #[test]
    fn test_column_values_float_shortest() {
        let col = Column::new("score", ColumnData::Float(vec![0.1, 2.5]));
        assert_eq!(column_values(&col), vec![json!(0.1), json!(2.5)]);
    }

    #[test]
    fn test_row_major() {
        let out = result_set_to_json(&columns(), false);
        assert_eq!(
            out,
            r#"[{"color":"red_7025","id":1},{"color":"pink_9298","id":2}]"#
        );
    }

    #[test]
    fn test_field_major() {
        let out = result_set_to_json(&columns(), true);
        assert_eq!(out, r#"[{"id":[1,2]},{"color":["red_7025","pink_9298"]}]"#);
    }

    #[test]
    fn test_empty_results() {
        let empty = vec![Column::int64("id", vec![])];
        assert_eq!(result_set_to_json(&empty, true), r#"[{"id":null}]"#);
        assert_eq!(result_set_to_json(&empty, false), "[]");
        assert_eq!(results_to_json(&[]), "[]");
    }

    #[test]
    fn test_results_keep_rows_per_query() {
        let hit = |id: i64, score: f32| SearchResult {
            result_count: 1,
            ids: vec![PrimaryKey::Int64(id)],
            scores: vec![score],
            fields: vec![Column::int64("id", vec![id])],
        };
        let out = results_to_json(&[hit(1, 0.9), hit(2, 0.5)]);
        assert_eq!(
            out,
            r#"[{"counts":1,"distances":[0.9],"rows":[{"id":1}]},{"counts":1,"distances":[0.5],"rows":[{"id":2}]}]"#
        );
    }

    #[test]
    fn test_reduce_array_length() {
        let v = json!({"vector": [1, 2, 3, 4], "nested": [[1, 2, 3]]});
        let out = reduce_array_length(v, 2);
        assert_eq!(out["vector"], json!([1, 2, "(2 more items hidden)"]));
        assert_eq!(out["nested"], json!([[1, 2, "(1 more items hidden)"]]));
    }

    #[test]
    fn test_pretty_with_tabs() {
        let out = pretty(r#"[{"id":1}]"#, "\t", None).unwrap();
        assert_eq!(out, "[\n\t{\n\t\t\"id\": 1\n\t}\n]");
    }

    #[test]
    fn test_pretty_rejects_garbage() {
        assert!(pretty("[not json", "  ", None).is_err());
    }
}
