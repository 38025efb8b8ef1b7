//! Property tests for projection, filtering and positional alignment.

use percolate_query::{Database, QueryEngine, Record, ResultRow, Table};
use proptest::prelude::*;
use serde_json::{json, Value};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("fixtures are objects"),
    }
}

fn table(rows: impl IntoIterator<Item = Value>) -> Table {
    Table::new(rows.into_iter().map(record).collect())
}

proptest! {
    #[test]
    fn projection_round_trips(values in prop::collection::vec("[A-Za-z ,'.]{0,12}", 1..25)) {
        let db = Database::new().with_table(
            "t",
            table(values.iter().enumerate().map(|(i, c)| json!({"k": i, "c": c}))),
        );

        let result = QueryEngine::new(db).execute("SELECT t.c FROM t").unwrap();

        let expected: Vec<ResultRow> = values
            .iter()
            .map(|c| record(json!({"t.c": c})))
            .collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn filter_keeps_exactly_matching_rows(
        keys in prop::collection::vec(0u32..5, 1..30),
        literal in 0u32..5,
    ) {
        let db = Database::new().with_table(
            "t",
            table(keys.iter().enumerate().map(|(i, k)| json!({"k": k, "c": i}))),
        );

        let query = format!("SELECT t.c FROM t WHERE t.k = {}", literal);
        let result = QueryEngine::new(db).execute(&query).unwrap();

        let expected: Vec<ResultRow> = keys
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == literal)
            .map(|(i, _)| record(json!({"t.c": i})))
            .collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn cross_table_condition_aligns_by_position(
        ids in prop::collection::vec((0u8..4, 0u8..4), 1..20),
    ) {
        let db = Database::new()
            .with_table("a", table(ids.iter().enumerate().map(|(i, (id, _))| json!({"id": id, "x": i}))))
            .with_table("b", table(ids.iter().enumerate().map(|(i, (_, id))| json!({"id": id, "y": i * 10}))));

        let result = QueryEngine::new(db)
            .execute("SELECT a.x, b.y FROM a, b WHERE a.id = b.id")
            .unwrap();

        let expected: Vec<ResultRow> = ids
            .iter()
            .enumerate()
            .filter(|(_, (left, right))| left == right)
            .map(|(i, _)| record(json!({"a.x": i, "b.y": i * 10})))
            .collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn quoted_literal_survives_normalization(literal in "[A-Za-z][A-Za-z ]{0,10}") {
        let db = Database::new().with_table(
            "t",
            table(vec![json!({"name": literal.clone()}), json!({"name": literal.to_lowercase()})]),
        );

        let query = format!("SELECT T.NAME FROM T WHERE T.NAME = '{}'", literal);
        let result = QueryEngine::new(db).execute(&query).unwrap();

        prop_assert!(!result.is_empty());
        prop_assert_eq!(&result[0]["t.name"], &json!(literal));
        if literal != literal.to_lowercase() {
            prop_assert_eq!(result.len(), 1);
        }
    }
}
