use super::{Shared, SqlMap};
use crate::{
    catalog, driver::Driver, loader::ResultLoader, probe::Probe, stmt::Type, types::TypeHandler,
    MappedStatement, ResultMap, Result, Settings,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Catalog builder
    core: catalog::Builder,
}

impl Builder {
    pub fn result_map(&mut self, result_map: ResultMap) -> &mut Self {
        self.core.result_map(result_map);
        self
    }

    pub fn statement(&mut self, statement: MappedStatement) -> &mut Self {
        self.core.statement(statement);
        self
    }

    pub fn type_handler(
        &mut self,
        ty: Type,
        jdbc_type: Option<&str>,
        handler: impl TypeHandler,
    ) -> &mut Self {
        self.core.type_handler(ty, jdbc_type, handler);
        self
    }

    pub fn probe(&mut self, probe: impl Probe) -> &mut Self {
        self.core.probe(probe);
        self
    }

    pub fn loader(&mut self, loader: impl ResultLoader) -> &mut Self {
        self.core.loader(loader);
        self
    }

    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.core.settings(settings);
        self
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<SqlMap> {
        let catalog = self.core.build()?;

        tracing::debug!(
            url = %driver.url(),
            result_maps = catalog.result_maps().count(),
            statements = catalog.statements().count(),
            "sql map built"
        );

        Ok(SqlMap {
            shared: Arc::new(Shared {
                catalog: Arc::new(catalog),
                driver: Box::new(driver),
            }),
        })
    }
}
