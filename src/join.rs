//! Build-probe hash join over two [`Table`]s.

use crate::error::{BifrostError, Result};
use crate::hash::{CollisionStrategy, HashTable};
use crate::profiler::Profiler;
use crate::row::Row;
use crate::table::Table;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Which rows a join emits relative to its two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    /// Only rows with a match on both sides.
    Inner,
    /// Every left row; unmatched left rows pair with right-side nulls.
    LeftOuter,
    /// Every right row; unmatched right rows pair with left-side nulls.
    RightOuter,
    /// Every row from both sides; unmatched rows pair with nulls.
    FullOuter,
}

/// Orchestrates one build-probe hash join and owns the [`Profiler`] recording it.
///
/// Grounded in the teacher's `hash_join.rs` build/probe structure — construct
/// a hash table over the smaller input, then stream the larger input through
/// it — generalized from that module's fixed inner-equi-join to the four
/// join modes this engine supports, and carrying a `Profiler` instead of the
/// teacher's `ExecutionContext` metrics sink (there is no block-execution
/// runtime here to report into).
#[derive(Debug, Default)]
pub struct JoinEngine {
    profiler: Profiler,
}

impl JoinEngine {
    /// A fresh engine with an empty profiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// The profiler recording the most recently completed `hash_join` call.
    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Joins `left` and `right` on the named columns under `join_type`,
    /// building the hash table over whichever side has fewer rows.
    ///
    /// Fails with [`BifrostError::MissingJoinColumn`] if either column name
    /// is absent, or [`BifrostError::InvalidJoinKey`] if any row's join
    /// column holds `NaN` — checked for every row before any row is consumed,
    /// so a failing call never returns a partial result.
    pub fn hash_join(
        &mut self,
        left: &Table,
        left_key: &str,
        right: &Table,
        right_key: &str,
        join_type: JoinType,
        strategy: CollisionStrategy,
    ) -> Result<Table> {
        let left_key_idx = left.column_index(left_key).ok_or_else(|| BifrostError::MissingJoinColumn {
            side: "left",
            column: left_key.to_string(),
        })?;
        let right_key_idx = right.column_index(right_key).ok_or_else(|| BifrostError::MissingJoinColumn {
            side: "right",
            column: right_key.to_string(),
        })?;

        self.profiler = Profiler::new();
        self.profiler.start();

        let left_is_build = left.row_count() <= right.row_count();
        let (build, build_key_idx, probe, probe_key_idx) = if left_is_build {
            (left, left_key_idx, right, right_key_idx)
        } else {
            (right, right_key_idx, left, left_key_idx)
        };

        for row in build.rows() {
            reject_nan(&row[build_key_idx])?;
        }
        for row in probe.rows() {
            reject_nan(&row[probe_key_idx])?;
        }

        let mut table: HashTable<usize> =
            HashTable::with_default_hasher(build.row_count().max(1) * 2, strategy);
        for (i, row) in build.rows().iter().enumerate() {
            table.insert(row[build_key_idx].clone(), i);
        }
        self.profiler.mark_build_complete();
        self.profiler.record_hash_stats(table.stats().clone());
        log::debug!("build phase complete: {} rows inserted into build side", build.row_count());

        let mut result = Table::new(format!("{}_join_{}", left.name(), right.name()));
        for col in left.schema() {
            result.add_column(format!("L_{}", col.name), col.declared_type);
        }
        for col in right.schema() {
            result.add_column(format!("R_{}", col.name), col.declared_type);
        }

        let mut build_matched = vec![false; build.row_count()];
        let emit_left_outer_on_miss = !left_is_build
            && matches!(join_type, JoinType::LeftOuter | JoinType::FullOuter);
        let emit_right_outer_on_miss =
            left_is_build && matches!(join_type, JoinType::RightOuter | JoinType::FullOuter);

        for probe_row in probe.rows() {
            let probe_key = &probe_row[probe_key_idx];
            let matches = table.find(probe_key);
            if !matches.is_empty() {
                for i in matches {
                    build_matched[i] = true;
                    let build_row = &build.rows()[i];
                    let combined = if left_is_build {
                        build_row.concat(probe_row)
                    } else {
                        probe_row.concat(build_row)
                    };
                    result.add_row(combined)?;
                }
            } else if emit_left_outer_on_miss {
                result.add_row(probe_row.concat(&Row::nulls(right.column_count())))?;
            } else if emit_right_outer_on_miss {
                result.add_row(Row::nulls(left.column_count()).concat(probe_row))?;
            }
        }
        self.profiler.mark_probe_complete();
        log::debug!("probe phase complete: {} rows probed", probe.row_count());

        let complete_unmatched_build = (left_is_build
            && matches!(join_type, JoinType::RightOuter | JoinType::FullOuter))
            || (!left_is_build && matches!(join_type, JoinType::LeftOuter | JoinType::FullOuter));
        if complete_unmatched_build {
            for (i, matched) in build_matched.iter().enumerate() {
                if *matched {
                    continue;
                }
                let build_row = &build.rows()[i];
                let combined = if left_is_build {
                    build_row.concat(&Row::nulls(right.column_count()))
                } else {
                    Row::nulls(left.column_count()).concat(build_row)
                };
                result.add_row(combined)?;
            }
        }

        let cartesian_rows = left.row_count().saturating_mul(right.row_count());
        self.profiler.record_results(result.row_count(), cartesian_rows);
        self.profiler.stop();
        log::debug!(
            "join {} x {} -> {} rows ({:?}, {:?})",
            left.name(),
            right.name(),
            result.row_count(),
            join_type,
            strategy
        );

        Ok(result)
    }
}

fn reject_nan(value: &Value) -> Result<()> {
    if value.is_nan() {
        return Err(BifrostError::InvalidJoinKey(
            "NaN cannot be used as a join key".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;

    fn left_table() -> Table {
        let mut t = Table::new("L");
        t.add_column("id", DataType::Integer);
        t.add_column("name", DataType::String);
        for (id, name) in [(1i64, "a"), (2, "b"), (2, "c"), (4, "d")] {
            let mut row = Row::new();
            row.push(id);
            row.push(name);
            t.add_row(row).unwrap();
        }
        t
    }

    fn right_table() -> Table {
        let mut t = Table::new("R");
        t.add_column("id", DataType::Integer);
        t.add_column("score", DataType::Integer);
        for (id, score) in [(2i64, 10), (2, 20), (3, 30)] {
            let mut row = Row::new();
            row.push(id);
            row.push(score);
            t.add_row(row).unwrap();
        }
        t
    }

    #[test]
    fn inner_join_emits_only_matches_with_duplicate_keys_expanded() {
        let mut engine = JoinEngine::new();
        let result = engine
            .hash_join(
                &left_table(),
                "id",
                &right_table(),
                "id",
                JoinType::Inner,
                CollisionStrategy::Chaining,
            )
            .unwrap();
        // id=2 appears twice on each side -> 2*2 = 4 combined rows.
        assert_eq!(result.row_count(), 4);
    }

    #[test]
    fn left_outer_preserves_every_left_row() {
        let mut engine = JoinEngine::new();
        let result = engine
            .hash_join(
                &left_table(),
                "id",
                &right_table(),
                "id",
                JoinType::LeftOuter,
                CollisionStrategy::Chaining,
            )
            .unwrap();
        // ids 1 and 4 unmatched (1 row each), id=2 matches twice on each side (4 rows).
        assert_eq!(result.row_count(), 6);
    }

    #[test]
    fn right_outer_preserves_every_right_row() {
        let mut engine = JoinEngine::new();
        let result = engine
            .hash_join(
                &left_table(),
                "id",
                &right_table(),
                "id",
                JoinType::RightOuter,
                CollisionStrategy::LinearProbing,
            )
            .unwrap();
        // id=3 unmatched (1 row), id=2 matches twice on each side (4 rows).
        assert_eq!(result.row_count(), 5);
    }

    #[test]
    fn full_outer_covers_both_sides_without_double_emission() {
        let mut engine = JoinEngine::new();
        let result = engine
            .hash_join(
                &left_table(),
                "id",
                &right_table(),
                "id",
                JoinType::FullOuter,
                CollisionStrategy::Chaining,
            )
            .unwrap();
        // 4 matched + 1 unmatched left (id=1,4 -> 2) + 1 unmatched right (id=3).
        assert_eq!(result.row_count(), 4 + 2 + 1);
    }

    #[test]
    fn missing_column_fails_with_typed_error() {
        let mut engine = JoinEngine::new();
        let err = engine
            .hash_join(
                &left_table(),
                "nope",
                &right_table(),
                "id",
                JoinType::Inner,
                CollisionStrategy::Chaining,
            )
            .unwrap_err();
        assert!(matches!(err, BifrostError::MissingJoinColumn { .. }));
    }

    #[test]
    fn nan_join_key_fails_before_consuming_any_row() {
        let mut left = Table::new("L");
        left.add_column("id", DataType::Double);
        let mut row = Row::new();
        row.push(f64::NAN);
        left.add_row(row).unwrap();

        let mut engine = JoinEngine::new();
        let err = engine
            .hash_join(
                &left,
                "id",
                &right_table(),
                "id",
                JoinType::Inner,
                CollisionStrategy::Chaining,
            )
            .unwrap_err();
        assert!(matches!(err, BifrostError::InvalidJoinKey(_)));
    }

    #[test]
    fn result_schema_prefixes_columns_by_side() {
        let mut engine = JoinEngine::new();
        let result = engine
            .hash_join(
                &left_table(),
                "id",
                &right_table(),
                "id",
                JoinType::Inner,
                CollisionStrategy::Chaining,
            )
            .unwrap();
        let names: Vec<&str> = result.schema().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["L_id", "L_name", "R_id", "R_score"]);
    }

    #[test]
    fn profiler_records_a_nonzero_selectivity() {
        let mut engine = JoinEngine::new();
        engine
            .hash_join(
                &left_table(),
                "id",
                &right_table(),
                "id",
                JoinType::Inner,
                CollisionStrategy::Chaining,
            )
            .unwrap();
        assert!(engine.profiler().data().selectivity_pct > 0.0);
    }
}
