mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use sqlmap_core::{
    async_trait,
    driver::{Driver, MemoryRowSet, Operation, Response},
    Error, Result,
};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug)]
pub struct Sqlite {
    location: Location,

    /// SQL run on every new connection, e.g. to create the schema of an
    /// in-memory database
    init: Option<String>,
}

#[derive(Debug)]
enum Location {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::database)?;

        if url.scheme() != "sqlite" {
            return Err(Error::configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        let location = if url.path() == ":memory:" {
            Location::InMemory
        } else {
            Location::File(PathBuf::from(url.path()))
        };

        Ok(Self {
            location,
            init: None,
        })
    }

    /// Create an in-memory SQLite database. Every connection opens its own
    /// database.
    pub fn in_memory() -> Self {
        Self {
            location: Location::InMemory,
            init: None,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            init: None,
        }
    }

    /// Runs `sql`, which may hold several statements, on each new connection.
    pub fn init(mut self, sql: impl Into<String>) -> Self {
        self.init = Some(sql.into());
        self
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match &self.location {
            Location::InMemory => Cow::Borrowed("sqlite::memory:"),
            Location::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    async fn connect(&self) -> Result<Box<dyn sqlmap_core::Connection>> {
        let connection = match &self.location {
            Location::File(path) => Connection::open(path)?,
            Location::InMemory => Connection::in_memory()?,
        };

        if let Some(init) = &self.init {
            connection
                .connection
                .execute_batch(init)
                .map_err(Error::database)?;
        }

        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::database)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::database)?;
        Ok(Self { connection })
    }

    fn query(&mut self, sql: &str, params: Vec<Value>) -> Result<MemoryRowSet> {
        let mut stmt = self.connection.prepare_cached(sql).map_err(Error::database)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut row_set = MemoryRowSet::new(columns);

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::database)?;

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);
                    for index in 0..width {
                        let value = row.get_ref(index).map_err(Error::database)?;
                        items.push(Value::from_sql(value).into_inner());
                    }
                    row_set.push_row(items);
                }
                Ok(None) => break,
                Err(err) => return Err(Error::database(err)),
            }
        }

        Ok(row_set)
    }

    fn execute(&mut self, sql: &str, params: Vec<Value>) -> Result<u64> {
        let mut stmt = self.connection.prepare_cached(sql).map_err(Error::database)?;
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::database)?;
        Ok(count as u64)
    }
}

#[async_trait]
impl sqlmap_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        tracing::debug!(kind = op.kind(), sql = op.sql(), params = op.params().len(), "sqlite exec");

        match op {
            Operation::QuerySql(op) => {
                let params = op.params.into_values().into_iter().map(Value::from).collect();
                let rows = self.query(&op.sql, params)?;
                Ok(Response::row_set(rows))
            }
            Operation::ExecSql(op) => {
                let params = op.params.into_values().into_iter().map(Value::from).collect();
                let count = self.execute(&op.sql, params)?;
                Ok(Response::count(count))
            }
            Operation::CallSql(op) => Err(Error::protocol(format!(
                "SQLite has no stored procedures; cannot run `{}`",
                op.sql
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlmap_core::driver::{
        operation::{CallSql, ExecSql, QuerySql},
        Params, RowSet,
    };
    use sqlmap_core::stmt::Value as CoreValue;

    fn exec(sql: &str, params: Vec<CoreValue>) -> Operation {
        ExecSql {
            sql: sql.to_string(),
            params: Params::from_vec(params),
        }
        .into()
    }

    fn query(sql: &str, params: Vec<CoreValue>) -> Operation {
        QuerySql {
            sql: sql.to_string(),
            params: Params::from_vec(params),
        }
        .into()
    }

    #[test]
    fn urls_need_the_sqlite_scheme() {
        assert_eq!(
            Sqlite::new("sqlite::memory:").unwrap().url(),
            "sqlite::memory:"
        );
        assert_eq!(
            Sqlite::new("sqlite:/tmp/items.db").unwrap().url(),
            "sqlite:/tmp/items.db"
        );

        let err = Sqlite::new("postgres://localhost/items").unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn init_runs_on_connect() {
        let driver = Sqlite::in_memory().init(
            "create table item (id integer primary key, name text);
             insert into item values (1, 'bolt');",
        );
        let mut conn = driver.connect().await.unwrap();

        let response = conn
            .exec(query("select id, name from item where id = ?", vec![CoreValue::I32(1)]))
            .await
            .unwrap();

        let mut rows = response.rows.into_values();
        assert_eq!(rows.columns(), &["id".to_string(), "name".to_string()]);
        assert!(rows.next().unwrap());
        assert_eq!(rows.get_i32(sqlmap_core::driver::Column::Name("ID")).unwrap(), 1);
        assert_eq!(
            rows.get_string(sqlmap_core::driver::Column::Index(1)).unwrap(),
            Some("bolt".to_string())
        );
        assert!(!rows.next().unwrap());
    }

    #[tokio::test]
    async fn exec_reports_changed_rows() {
        let driver = Sqlite::in_memory().init("create table item (id integer);");
        let mut conn = driver.connect().await.unwrap();

        for id in 1..=3 {
            conn.exec(exec("insert into item (id) values (?)", vec![CoreValue::I64(id)]))
                .await
                .unwrap();
        }

        let response = conn
            .exec(exec("delete from item where id > ?", vec![CoreValue::I32(1)]))
            .await
            .unwrap();
        assert_eq!(response.rows.count(), 2);
    }

    #[tokio::test]
    async fn procedures_are_unsupported() {
        let mut conn = Sqlite::in_memory().connect().await.unwrap();

        let err = conn
            .exec(
                CallSql {
                    sql: "{call next_id(?)}".to_string(),
                    params: Params::new(),
                    outputs: vec![],
                }
                .into(),
            )
            .await
            .unwrap_err();
        assert!(err.is_protocol());
    }

    #[tokio::test]
    async fn sql_errors_are_database_errors() {
        let mut conn = Sqlite::in_memory().connect().await.unwrap();

        let err = conn.exec(query("select * from missing", vec![])).await.unwrap_err();
        assert!(err.is_database());
    }
}
