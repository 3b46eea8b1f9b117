pub mod db;

use sqlmap::{Builder, SqlMap};

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// Builds the SQL map against a fresh database initialized with `schema`.
    async fn setup(&self, builder: &mut Builder, schema: &str) -> SqlMap {
        self.connect(builder, schema).await.unwrap()
    }

    async fn connect(&self, builder: &mut Builder, schema: &str) -> sqlmap::Result<SqlMap>;
}

/// Installs a test-friendly subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    $crate::init_tracing();
                    super::$f($crate::db::sqlite::SetupSqlite).await;
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}
