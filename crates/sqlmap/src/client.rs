mod builder;
pub use builder::Builder;

use crate::{driver::Driver, Catalog, Result, Session};

use std::sync::Arc;

/// A configured SQL map bound to a database driver.
///
/// `SqlMap` is cheap to clone and can be shared across tasks. Statements run
/// on a [`Session`].
#[derive(Clone)]
pub struct SqlMap {
    shared: Arc<Shared>,
}

struct Shared {
    catalog: Arc<Catalog>,
    driver: Box<dyn Driver>,
}

impl SqlMap {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Opens a connection and returns a session running on it.
    pub async fn session(&self) -> Result<Session> {
        let connection = self.shared.driver.connect().await?;
        Ok(Session::new(self.shared.catalog.clone(), connection))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.shared.catalog
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }
}

impl std::fmt::Debug for SqlMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlMap")
            .field("driver", &self.shared.driver.url())
            .field("result_maps", &self.shared.catalog.result_maps().count())
            .field("statements", &self.shared.catalog.statements().count())
            .finish()
    }
}
