use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use super::db_error;
use crate::entity::{brand, product};
use crate::error::CatalogResult;
use crate::sequence::{SequenceRepository, SequencedEntity};

#[derive(Clone)]
pub struct PgSequenceRepository {
    db: DatabaseConnection,
}

impl PgSequenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Moves every row of `table` to ids 1..N in ascending order of its old id.
///
/// Walking upwards never collides: rows already handled occupy 1..i and
/// every row not yet handled has an id above i+1.
async fn renumber_table<E>(
    txn: &DatabaseTransaction,
    id_column: E::Column,
    table: &str,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
    E::Column: ColumnTrait,
{
    let ids: Vec<i32> = E::find()
        .select_only()
        .column(id_column)
        .order_by_asc(id_column)
        .into_tuple()
        .all(txn)
        .await?;

    let mut changed = 0;
    for (new_id, old_id) in (1..).zip(ids) {
        if new_id == old_id {
            continue;
        }
        E::update_many()
            .col_expr(id_column, Expr::value(new_id))
            .filter(id_column.eq(old_id))
            .exec(txn)
            .await?;
        changed += 1;
    }

    txn.execute_unprepared(&format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         COALESCE((SELECT MAX(id) FROM \"{table}\"), 0) + 1, false)"
    ))
    .await?;

    Ok(changed)
}

#[async_trait]
impl SequenceRepository for PgSequenceRepository {
    async fn renumber(&self, entity: SequencedEntity) -> CatalogResult<u64> {
        let txn = self.db.begin().await.map_err(db_error)?;

        // product.brand_id follows through ON UPDATE CASCADE
        let changed = match entity {
            SequencedEntity::Product => {
                renumber_table::<product::Entity>(&txn, product::Column::Id, "product").await
            }
            SequencedEntity::Brand => {
                renumber_table::<brand::Entity>(&txn, brand::Column::Id, "brand").await
            }
        }
        .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        tracing::debug!(entity = %entity, changed, "Renumbered table");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement, Value, Values};
    use std::collections::BTreeMap;

    fn id_rows(ids: &[i32]) -> Vec<BTreeMap<&'static str, Value>> {
        ids.iter()
            .map(|id| BTreeMap::from([("id", Value::from(*id))]))
            .collect()
    }

    fn exec_results(count: usize) -> Vec<MockExecResult> {
        (0..count)
            .map(|_| MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            })
            .collect()
    }

    fn logged_statements(db: DatabaseConnection) -> Vec<Statement> {
        db.into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().to_vec())
            .collect()
    }

    #[tokio::test]
    async fn test_renumber_moves_ids_upwards_then_resets_sequence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([id_rows(&[2, 3, 5])])
            .append_exec_results(exec_results(4))
            .into_connection();
        let repo = PgSequenceRepository::new(db.clone());

        let changed = repo.renumber(SequencedEntity::Product).await.unwrap();
        assert_eq!(changed, 3);

        let statements = logged_statements(db);
        assert_eq!(statements.first().map(|s| s.sql.as_str()), Some("BEGIN"));
        assert_eq!(statements.last().map(|s| s.sql.as_str()), Some("COMMIT"));

        let updates: Vec<_> = statements
            .iter()
            .filter(|s| s.sql.starts_with("UPDATE"))
            .collect();
        assert_eq!(updates.len(), 3);
        for (stmt, (new_id, old_id)) in updates.iter().zip([(1, 2), (2, 3), (3, 5)]) {
            assert!(stmt.sql.contains(r#"UPDATE "product" SET "id""#));
            assert_eq!(
                stmt.values,
                Some(Values(vec![Value::from(new_id), Value::from(old_id)]))
            );
        }

        let setval = statements
            .iter()
            .position(|s| s.sql.contains("setval"))
            .unwrap();
        let last_update = statements
            .iter()
            .rposition(|s| s.sql.starts_with("UPDATE"))
            .unwrap();
        assert!(setval > last_update);
        assert!(statements[setval]
            .sql
            .contains("pg_get_serial_sequence('product', 'id')"));
    }

    #[tokio::test]
    async fn test_contiguous_ids_only_reset_sequence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([id_rows(&[1, 2])])
            .append_exec_results(exec_results(1))
            .into_connection();
        let repo = PgSequenceRepository::new(db.clone());

        let changed = repo.renumber(SequencedEntity::Brand).await.unwrap();
        assert_eq!(changed, 0);

        let statements = logged_statements(db);
        assert!(!statements.iter().any(|s| s.sql.starts_with("UPDATE")));
        assert!(statements.iter().any(|s| s
            .sql
            .contains("pg_get_serial_sequence('brand', 'id')")));
    }
}
