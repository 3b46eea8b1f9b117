use super::*;
use crate::stmt::Type;

use indexmap::IndexMap;
use std::sync::Arc;

/// Resolves a `(host type, jdbc type)` pair to a [`TypeHandler`].
///
/// Registrations for a specific jdbc type take precedence over the
/// registration for the host type alone. Custom registrations replace the
/// built-ins.
#[derive(Debug, Clone)]
pub struct TypeHandlerFactory {
    handlers: IndexMap<String, IndexMap<Option<String>, Arc<dyn TypeHandler>>>,
    unknown: Arc<dyn TypeHandler>,
}

impl TypeHandlerFactory {
    /// A factory with the built-in handlers registered.
    pub fn new() -> TypeHandlerFactory {
        let mut factory = TypeHandlerFactory {
            handlers: IndexMap::new(),
            unknown: Arc::new(ObjectTypeHandler),
        };

        factory.register(&Type::Bool, None, Arc::new(BooleanTypeHandler));
        factory.register(&Type::I32, None, Arc::new(IntegerTypeHandler));
        factory.register(&Type::I64, None, Arc::new(LongTypeHandler));
        factory.register(&Type::F64, None, Arc::new(DoubleTypeHandler));
        factory.register(&Type::String, None, Arc::new(StringTypeHandler));
        factory.register(&Type::Bytes, None, Arc::new(BytesTypeHandler));
        factory.register(&Type::Timestamp, None, Arc::new(SqlTimestampTypeHandler));
        factory.register(&Type::Object, None, Arc::new(ObjectTypeHandler));

        factory
    }

    pub fn register(
        &mut self,
        ty: &Type,
        jdbc_type: Option<&str>,
        handler: Arc<dyn TypeHandler>,
    ) {
        self.handlers
            .entry(ty.name().to_string())
            .or_default()
            .insert(jdbc_type.map(str::to_ascii_uppercase), handler);
    }

    pub fn get_type_handler(
        &self,
        ty: &Type,
        jdbc_type: Option<&str>,
    ) -> Option<Arc<dyn TypeHandler>> {
        let by_jdbc = self.handlers.get(ty.name())?;

        jdbc_type
            .and_then(|jdbc_type| by_jdbc.get(&Some(jdbc_type.to_ascii_uppercase())))
            .or_else(|| by_jdbc.get(&None))
            .cloned()
    }

    pub fn has_type_handler(&self, ty: &Type) -> bool {
        self.handlers.contains_key(ty.name())
    }

    /// The handler used when nothing more specific is registered.
    pub fn unknown_type_handler(&self) -> Arc<dyn TypeHandler> {
        self.unknown.clone()
    }
}

impl Default for TypeHandlerFactory {
    fn default() -> Self {
        TypeHandlerFactory::new()
    }
}
