use super::Catalog;
use crate::{
    err,
    loader::{ResultLoader, StatementLoader},
    mapping::Route,
    probe::{GenericProbe, Probe},
    stmt::Type,
    types::{TypeHandler, TypeHandlerFactory},
    Error, MappedStatement, ResultMap, Result, Settings,
};

use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Collects result maps and statements, then resolves and verifies them
/// into a [`Catalog`].
#[derive(Debug, Default)]
pub struct Builder {
    result_maps: Vec<ResultMap>,
    statements: Vec<MappedStatement>,
    type_handlers: TypeHandlerFactory,
    probe: Option<Arc<dyn Probe>>,
    loader: Option<Arc<dyn ResultLoader>>,
    settings: Settings,
}

impl Builder {
    pub fn result_map(&mut self, result_map: ResultMap) -> &mut Self {
        self.result_maps.push(result_map);
        self
    }

    pub fn statement(&mut self, statement: MappedStatement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    /// Registers a type handler, replacing any handler for the same pair.
    pub fn type_handler(
        &mut self,
        ty: Type,
        jdbc_type: Option<&str>,
        handler: impl TypeHandler,
    ) -> &mut Self {
        self.type_handlers
            .register(&ty, jdbc_type, Arc::new(handler));
        self
    }

    pub fn probe(&mut self, probe: impl Probe) -> &mut Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    pub fn loader(&mut self, loader: impl ResultLoader) -> &mut Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn build(&mut self) -> Result<Catalog> {
        let Builder {
            result_maps,
            statements,
            type_handlers,
            probe,
            loader,
            settings,
        } = std::mem::take(self);

        let mut result_maps = index_by_id(result_maps, ResultMap::id, "result map")?;
        let mut statements = index_by_id(statements, MappedStatement::id, "statement")?;

        // Statements with a result class and no result map read through a
        // map derived from their columns.
        for statement in statements.values_mut() {
            if statement.result_map_id().is_some() {
                continue;
            }
            let Some(result_class) = statement.result_type().cloned() else {
                continue;
            };

            let id = format!("{}-AutoResultMap", statement.id());
            let auto = ResultMap::auto(id.clone(), result_class, statement.remaps_results());
            if result_maps.insert(id.clone(), auto).is_some() {
                return Err(duplicate("result map", &id));
            }
            *statement.result_map_mut() = Some(id);
        }

        if settings.use_statement_namespaces {
            qualify_references(&mut result_maps, &mut statements);
        }

        for result_map in result_maps.values_mut() {
            let result_class = result_map.result_class().cloned();
            let id = result_map.id().to_string();

            result_map
                .edit_mappings(|mapping| mapping.resolve(&type_handlers, result_class.as_ref()))
                .map_err(|cause| cause.context(err!("invalid result map {id}")))?;
        }

        for statement in statements.values_mut() {
            let parameter_class = statement.parameter_type().cloned();
            let id = statement.id().to_string();

            if let Some(parameter_map) = statement.parameter_map_mut() {
                parameter_map
                    .resolve(&type_handlers, parameter_class.as_ref())
                    .map_err(|cause| cause.context(err!("invalid statement {id}")))?;
            }
        }

        let catalog = Catalog {
            result_maps: result_maps
                .into_iter()
                .map(|(id, result_map)| (id, Arc::new(result_map)))
                .collect(),
            statements: statements
                .into_iter()
                .map(|(id, statement)| (id, Arc::new(statement)))
                .collect(),
            type_handlers,
            probe: probe.unwrap_or_else(|| Arc::new(GenericProbe)),
            loader: loader.unwrap_or_else(|| Arc::new(StatementLoader)),
            settings,
        };

        catalog.verify()?;
        Ok(catalog)
    }
}

fn index_by_id<T>(
    items: Vec<T>,
    id: impl Fn(&T) -> &str,
    what: &str,
) -> Result<IndexMap<String, T>> {
    let mut indexed = IndexMap::with_capacity(items.len());

    for item in items {
        let key = id(&item).to_string();
        if indexed.contains_key(&key) {
            return Err(duplicate(what, &key));
        }
        indexed.insert(key, item);
    }

    Ok(indexed)
}

fn duplicate(what: &str, id: &str) -> Error {
    Error::configuration(format!("There is already a {what} named {id} in this SqlMap."))
}

/// Rewrites references to ids in the referrer's own namespace to their
/// qualified form. References that are already qualified, or that name
/// nothing in the namespace, are left alone.
fn qualify_references(
    result_maps: &mut IndexMap<String, ResultMap>,
    statements: &mut IndexMap<String, MappedStatement>,
) {
    let map_ids: IndexSet<String> = result_maps.keys().cloned().collect();
    let statement_ids: IndexSet<String> = statements.keys().cloned().collect();

    for (owner, result_map) in result_maps.iter_mut() {
        let _ = result_map.edit_mappings(|mapping| {
            match mapping.route_mut() {
                Route::NestedResultMap { result_map: id } => qualify(owner, id, &map_ids),
                Route::NestedSelect { statement: id } => qualify(owner, id, &statement_ids),
                Route::Primitive => {}
            }
            Ok(())
        });

        if let Some(discriminator) = result_map.discriminator_mut() {
            for sub_map in discriminator.sub_map_ids_mut() {
                qualify(owner, sub_map, &map_ids);
            }
        }
    }

    for (owner, statement) in statements.iter_mut() {
        if let Some(result_map) = statement.result_map_mut() {
            qualify(owner, result_map, &map_ids);
        }
    }
}

fn qualify(owner: &str, reference: &mut String, known: &IndexSet<String>) {
    let Some((namespace, _)) = owner.rsplit_once('.') else {
        return;
    };

    let qualified = format!("{namespace}.{reference}");
    if known.contains(&qualified) {
        *reference = qualified;
    }
}
