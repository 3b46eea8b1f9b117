use crate::Setup;
use sqlmap::{Builder, SqlMap};
use sqlmap_driver_sqlite::Sqlite;

pub struct SetupSqlite;

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    async fn connect(&self, builder: &mut Builder, schema: &str) -> sqlmap::Result<SqlMap> {
        builder.build(Sqlite::in_memory().init(schema)).await
    }
}
