//! Integration tests: wiring `DataLoader`, `Table`, and `JoinEngine` together.
//!
//! These cover the concrete scenarios (S1-S6) from the join engine's design
//! notes: basic inner joins, duplicate keys, outer-join misses on both
//! sides, and the two invariances a caller should never have to think
//! about — which collision strategy was used, and which side became build.

use crate::hash::CollisionStrategy;
use crate::join::{JoinEngine, JoinType};
use crate::row::Row;
use crate::schema::DataType;
use crate::table::Table;
use crate::value::Value;

fn table(name: &str, key_col: &str, val_col: &str, rows: &[(i64, &str)]) -> Table {
    let mut t = Table::new(name);
    t.add_column(key_col, DataType::Integer);
    t.add_column(val_col, DataType::String);
    for (k, v) in rows {
        let mut row = Row::new();
        row.push(*k);
        row.push(*v);
        t.add_row(row).unwrap();
    }
    t
}

fn row_key_values(t: &Table, col: &str) -> Vec<(Value, Value)> {
    let ki = t.column_index(col).unwrap();
    t.rows()
        .iter()
        .map(|r| (r[ki].clone(), r[t.column_count() - 1].clone()))
        .collect()
}

#[test]
fn s1_basic_inner() {
    let left = table("L", "k", "v", &[(1, "A"), (2, "B"), (3, "C")]);
    let right = table("R", "k", "v", &[(2, "x"), (3, "y"), (4, "z")]);
    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&left, "k", &right, "k", JoinType::Inner, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(result.row_count(), 2);
    let l_key = result.column_index("L_k").unwrap();
    let mut keys: Vec<i64> = result
        .rows()
        .iter()
        .map(|r| match &r[l_key] {
            Value::Int(i) => *i,
            _ => unreachable!(),
        })
        .collect();
    keys.sort();
    assert_eq!(keys, vec![2, 3]);
}

#[test]
fn s2_duplicate_keys_on_both_sides() {
    let left = table("L", "k", "v", &[(1, "A"), (1, "B")]);
    let right = table("R", "k", "v", &[(1, "x"), (1, "y")]);
    let mut engine = JoinEngine::new();

    for jt in [JoinType::Inner, JoinType::LeftOuter, JoinType::FullOuter] {
        let result = engine
            .hash_join(&left, "k", &right, "k", jt, CollisionStrategy::Chaining)
            .unwrap();
        assert_eq!(result.row_count(), 4, "{jt:?} should have 2*2 = 4 rows, no misses");
    }
}

#[test]
fn s3_left_outer_with_miss() {
    let left = table("L", "k", "v", &[(1, "A"), (9, "Z")]);
    let right = table("R", "k", "v", &[(1, "x")]);
    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&left, "k", &right, "k", JoinType::LeftOuter, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(result.row_count(), 2);

    let l_k = result.column_index("L_k").unwrap();
    let r_k = result.column_index("R_k").unwrap();
    let unmatched = result
        .rows()
        .iter()
        .find(|r| r[l_k] == Value::Int(9))
        .unwrap();
    assert_eq!(unmatched[r_k], Value::Null);
}

#[test]
fn s4_full_outer_misses_on_both_sides() {
    let left = table("L", "k", "v", &[(1, "A"), (2, "B")]);
    let right = table("R", "k", "v", &[(2, "x"), (3, "y")]);
    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&left, "k", &right, "k", JoinType::FullOuter, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(result.row_count(), 3);

    let l_k = result.column_index("L_k").unwrap();
    let r_k = result.column_index("R_k").unwrap();
    let has_left_only = result.rows().iter().any(|r| r[l_k] == Value::Int(1) && r[r_k] == Value::Null);
    let has_right_only = result.rows().iter().any(|r| r[l_k] == Value::Null && r[r_k] == Value::Int(3));
    let has_match = result.rows().iter().any(|r| r[l_k] == Value::Int(2) && r[r_k] == Value::Int(2));
    assert!(has_left_only && has_right_only && has_match);
}

#[test]
fn s5_strategy_does_not_change_result_multiset() {
    let left = table("L", "k", "v", &[(1, "A"), (2, "B"), (2, "C"), (5, "E")]);
    let right = table("R", "k", "v", &[(2, "x"), (2, "y"), (3, "z")]);
    let mut engine = JoinEngine::new();

    let chained = engine
        .hash_join(&left, "k", &right, "k", JoinType::FullOuter, CollisionStrategy::Chaining)
        .unwrap();
    let probed = engine
        .hash_join(&left, "k", &right, "k", JoinType::FullOuter, CollisionStrategy::LinearProbing)
        .unwrap();

    assert_eq!(chained.row_count(), probed.row_count());
    let mut a = row_key_values(&chained, "L_k");
    let mut b = row_key_values(&probed, "L_k");
    a.sort_by_key(|(k, v)| (format!("{k:?}"), format!("{v:?}")));
    b.sort_by_key(|(k, v)| (format!("{k:?}"), format!("{v:?}")));
    assert_eq!(a, b);
}

#[test]
fn s6_build_side_choice_does_not_change_result_multiset() {
    // Swapping which table is passed as "left" must not change which rows
    // come out, only which physical table happened to become the build side.
    let small = table("small", "k", "v", &[(1, "A")]);
    let large = table("large", "k", "v", &[(1, "x"), (1, "y"), (2, "z")]);
    let mut engine = JoinEngine::new();

    let a = engine
        .hash_join(&small, "k", &large, "k", JoinType::Inner, CollisionStrategy::Chaining)
        .unwrap();
    let b = engine
        .hash_join(&large, "k", &small, "k", JoinType::Inner, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(a.row_count(), b.row_count());
    assert_eq!(a.row_count(), 2);
}

#[test]
fn empty_inputs_produce_empty_result_with_concatenated_schema() {
    let left = table("L", "k", "v", &[]);
    let right = table("R", "k", "v", &[]);
    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&left, "k", &right, "k", JoinType::FullOuter, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(result.row_count(), 0);
    assert_eq!(result.column_count(), 4);
}

#[test]
fn join_against_empty_right_under_left_outer_pads_every_left_row() {
    let left = table("L", "k", "v", &[(1, "A"), (2, "B")]);
    let right = table("R", "k", "v", &[]);
    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&left, "k", &right, "k", JoinType::LeftOuter, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(result.row_count(), 2);
    let r_k = result.column_index("R_k").unwrap();
    assert!(result.rows().iter().all(|r| r[r_k] == Value::Null));
}

#[test]
fn null_join_keys_match_each_other() {
    let mut left = Table::new("L");
    left.add_column("k", DataType::Integer);
    let mut row = Row::new();
    row.push(Value::Null);
    left.add_row(row).unwrap();

    let mut right = Table::new("R");
    right.add_column("k", DataType::Integer);
    let mut row = Row::new();
    row.push(Value::Null);
    right.add_row(row).unwrap();

    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&left, "k", &right, "k", JoinType::Inner, CollisionStrategy::Chaining)
        .unwrap();
    assert_eq!(result.row_count(), 1);
}

#[test]
fn loader_output_feeds_directly_into_a_join() {
    // generate_test_table's schema is (id, value, name, score); join two
    // generated tables on `id` to make sure loader output satisfies every
    // invariant the join engine assumes (arity, column resolution, etc).
    let a = crate::loader::DataLoader::generate_test_table("a", 30, 1);
    let b = crate::loader::DataLoader::generate_test_table("b", 20, 1);
    let mut engine = JoinEngine::new();
    let result = engine
        .hash_join(&a, "id", &b, "id", JoinType::Inner, CollisionStrategy::LinearProbing)
        .unwrap();
    // ids in both tables are 1..=n with no duplicates, so inner join rows <= min(30, 20).
    assert!(result.row_count() <= 20);
}
