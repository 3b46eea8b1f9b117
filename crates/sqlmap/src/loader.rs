//! Running nested selects.

use crate::{
    async_trait,
    stmt::{Lazy, LazyLoad, Type, Value, ValueSet},
    Result, Session,
};

use std::fmt::Debug;

/// Runs the statement of a nested select and delivers its result as `target`.
#[async_trait]
pub trait ResultLoader: Debug + Send + Sync + 'static {
    async fn load_result(
        &self,
        session: &Session,
        statement: &str,
        parameter: Value,
        target: &Type,
    ) -> Result<Value>;
}

/// Runs nested selects on the session of the request that needs them.
///
/// Collection targets receive every object of a list query; other targets
/// receive the single object, or `Null` when there is none. With lazy loading
/// enabled, collection targets receive a [`Lazy`] value instead and the query
/// runs the first time it is read.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatementLoader;

#[async_trait]
impl ResultLoader for StatementLoader {
    async fn load_result(
        &self,
        session: &Session,
        statement: &str,
        parameter: Value,
        target: &Type,
    ) -> Result<Value> {
        if session.catalog().settings().lazy_loading_enabled && target.is_collection() {
            return Ok(Value::Lazy(Lazy::new(DeferredQuery {
                session: session.clone(),
                statement: statement.to_string(),
                parameter,
                target: target.clone(),
            })));
        }

        load(session, statement, parameter, target).await
    }
}

async fn load(session: &Session, statement: &str, parameter: Value, target: &Type) -> Result<Value> {
    if !target.is_collection() {
        return Ok(session
            .query_for_object(statement, parameter)
            .await?
            .unwrap_or_default());
    }

    let items = session.query_for_list(statement, parameter).await?;
    Ok(match target {
        Type::Set => Value::Set(items.into_iter().collect::<ValueSet>()),
        _ => Value::List(items),
    })
}

#[derive(Debug)]
struct DeferredQuery {
    session: Session,
    statement: String,
    parameter: Value,
    target: Type,
}

#[async_trait]
impl LazyLoad for DeferredQuery {
    async fn load(&self) -> Result<Value> {
        load(
            &self.session,
            &self.statement,
            self.parameter.clone(),
            &self.target,
        )
        .await
    }
}
