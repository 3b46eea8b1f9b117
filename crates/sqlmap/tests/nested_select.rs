use pretty_assertions::assert_eq;
use sqlmap::{
    async_trait,
    driver::MemoryRowSet,
    map,
    statement::{ParameterMap, ParameterMapping},
    stmt::{BeanType, DomNode, Type, Value},
    MappedStatement, Result, ResultLoader, ResultMap, ResultMapping, Session, Settings, SqlMap,
};
use sqlmap_driver_memory::Memory;
use std::sync::{Arc, Mutex};

/// Remembers every nested select it is asked to run and answers with a
/// fixed value.
#[derive(Debug, Clone)]
struct Recorder {
    calls: Arc<Mutex<Vec<(String, Value, Type)>>>,
    reply: Value,
}

impl Recorder {
    fn new(reply: Value) -> Recorder {
        Recorder {
            calls: Arc::default(),
            reply,
        }
    }

    fn calls(&self) -> Vec<(String, Value, Type)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultLoader for Recorder {
    async fn load_result(
        &self,
        _session: &Session,
        statement: &str,
        parameter: Value,
        target: &Type,
    ) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((statement.to_string(), parameter, target.clone()));
        Ok(self.reply.clone())
    }
}

fn product_map(category: ResultMapping) -> ResultMap {
    let mut product_map = ResultMap::builder("ProductMap");
    product_map
        .result_class(Type::Map)
        .mapping(ResultMapping::new("id").column("ID").ty(Type::I32))
        .mapping(category);
    product_map.build()
}

fn product_rows(cat_id: Value) -> MemoryRowSet {
    MemoryRowSet::new(["ID", "CAT_ID"]).row([Value::I32(1), cat_id])
}

#[tokio::test]
async fn loader_receives_column_value_and_target() -> Result<()> {
    let memory = Memory::new();
    memory.on_query("select id, cat_id from product", product_rows(Value::I32(7)));

    let category = Value::from(DomNode::text_element("category", "Tools"));
    let recorder = Recorder::new(category.clone());

    let db = SqlMap::builder()
        .result_map(product_map(
            ResultMapping::new("category")
                .column("CAT_ID")
                .ty(Type::Dom)
                .select("loadCategory"),
        ))
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(
            MappedStatement::select("loadCategory", "select * from category where id = ?")
                .result_class(Type::Dom),
        )
        .loader(recorder.clone())
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let products = session.query_for_list("getProducts", Value::Null).await?;

    assert_eq!(
        recorder.calls(),
        vec![("loadCategory".to_string(), Value::I32(7), Type::Dom)]
    );
    assert_eq!(products, vec![map! { "id" => 1, "category" => category }]);
    Ok(())
}

#[tokio::test]
async fn statement_loader_runs_the_nested_statement() -> Result<()> {
    let memory = Memory::new();
    memory
        .on_query("select id, cat_id from product", product_rows(Value::I32(7)))
        .on_query_with(
            "select id, name from category where id = ?",
            [Value::I32(7)],
            MemoryRowSet::new(["ID", "NAME"]).row([Value::I32(7), Value::from("Tools")]),
        );

    let db = SqlMap::builder()
        .result_map(product_map(
            ResultMapping::new("category")
                .column("CAT_ID")
                .ty(Type::Dom)
                .select("loadCategory"),
        ))
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(
            MappedStatement::select("loadCategory", "select id, name from category where id = ?")
                .result_class(Type::Dom),
        )
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let products = session.query_for_list("getProducts", Value::Null).await?;

    let mut category = DomNode::element("result");
    category.set_value("ID", Value::I32(7));
    category.set_value("NAME", Value::from("Tools"));

    assert_eq!(products, vec![map! { "id" => 1, "category" => category }]);
    assert_eq!(
        memory.log().params_of("from category"),
        vec![vec![Value::I32(7)]]
    );
    Ok(())
}

#[tokio::test]
async fn null_column_skips_the_nested_select() -> Result<()> {
    let memory = Memory::new();
    memory.on_query("select id, cat_id from product", product_rows(Value::Null));
    let recorder = Recorder::new(Value::from("unused"));

    let db = SqlMap::builder()
        .result_map(product_map(
            ResultMapping::new("category")
                .column("CAT_ID")
                .select("loadCategory"),
        ))
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(MappedStatement::select("loadCategory", "select * from category where id = ?"))
        .loader(recorder.clone())
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let products = session.query_for_list("getProducts", Value::Null).await?;

    assert!(recorder.calls().is_empty());
    assert_eq!(products, vec![map! { "id" => 1, "category" => Value::Null }]);
    Ok(())
}

#[tokio::test]
async fn composite_columns_build_a_map_parameter() -> Result<()> {
    let memory = Memory::new();
    memory
        .on_query(
            "select order_id, region from orders",
            MemoryRowSet::new(["ORDER_ID", "REGION"]).row([Value::I32(1), Value::from("EU")]),
        )
        .on_query_with(
            "select descr from line where order_id = ? and region = ?",
            [Value::I32(1), Value::from("EU")],
            MemoryRowSet::new(["DESCR"])
                .row([Value::from("x")])
                .row([Value::from("y")]),
        );

    let mut order_map = ResultMap::builder("OrderMap");
    order_map
        .result_class(Type::Map)
        .mapping(ResultMapping::new("orderId").column("ORDER_ID"))
        .mapping(
            ResultMapping::new("lines")
                .column("{id=ORDER_ID, region=REGION}")
                .ty(Type::List)
                .select("getLines"),
        );

    let db = SqlMap::builder()
        .result_map(order_map.build())
        .statement(
            MappedStatement::select("getOrders", "select order_id, region from orders")
                .result_map("OrderMap"),
        )
        .statement(
            MappedStatement::select(
                "getLines",
                "select descr from line where order_id = ? and region = ?",
            )
            .parameter_class(Type::Map)
            .parameter_map(
                ParameterMap::new("lineKey")
                    .parameter(ParameterMapping::new("id"))
                    .parameter(ParameterMapping::new("region")),
            )
            .result_class(Type::String),
        )
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let orders = session.query_for_list("getOrders", Value::Null).await?;

    assert_eq!(
        orders,
        vec![map! {
            "orderId" => 1,
            "lines" => vec![Value::from("x"), Value::from("y")],
        }]
    );
    Ok(())
}

#[tokio::test]
async fn dom_parameter_classes_receive_a_parameter_document() -> Result<()> {
    let memory = Memory::new();
    memory
        .on_query("select id, cat_id from product", product_rows(Value::I32(7)))
        .on_query_with(
            "select name from category where id = ?",
            [Value::from("7")],
            MemoryRowSet::new(["NAME"]).row([Value::from("Tools")]),
        );

    let db = SqlMap::builder()
        .result_map(product_map(
            ResultMapping::new("category")
                .column("CAT_ID")
                .ty(Type::String)
                .select("loadCategory"),
        ))
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(
            MappedStatement::select("loadCategory", "select name from category where id = ?")
                .parameter_class(Type::Dom)
                .parameter_map(ParameterMap::new("byValue").parameter(ParameterMapping::new("value")))
                .result_class(Type::String),
        )
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let products = session.query_for_list("getProducts", Value::Null).await?;

    assert_eq!(products, vec![map! { "id" => 1, "category" => "Tools" }]);
    Ok(())
}

#[tokio::test]
async fn bean_properties_pick_the_target_type() -> Result<()> {
    let memory = Memory::new();
    memory.on_query("select id, cat_id from product", product_rows(Value::I32(7)));
    let recorder = Recorder::new(Value::List(vec![]));

    let product = BeanType::builder("Product")
        .property("id", Type::I32)
        .property("tags", Type::Set)
        .build();

    let mut product_map = ResultMap::builder("ProductMap");
    product_map
        .result_class(Type::Bean(product))
        .mapping(ResultMapping::new("id").column("ID"))
        .mapping(ResultMapping::new("tags").column("ID").select("loadTags"));

    let db = SqlMap::builder()
        .result_map(product_map.build())
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(MappedStatement::select("loadTags", "select tag from tag where product_id = ?"))
        .loader(recorder.clone())
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    session.query_for_list("getProducts", Value::Null).await?;

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].2, Type::Set);
    Ok(())
}

#[tokio::test]
async fn empty_nested_result_takes_the_null_sentinel() -> Result<()> {
    let memory = Memory::new();
    memory
        .on_query("select id, cat_id from product", product_rows(Value::I32(7)))
        .on_query("select name from category where id = ?", MemoryRowSet::new(["NAME"]));

    let db = SqlMap::builder()
        .result_map(product_map(
            ResultMapping::new("category")
                .column("CAT_ID")
                .ty(Type::String)
                .null_value("uncategorized")
                .select("loadCategory"),
        ))
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(
            MappedStatement::select("loadCategory", "select name from category where id = ?")
                .result_class(Type::String),
        )
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let products = session.query_for_list("getProducts", Value::Null).await?;

    assert_eq!(
        products,
        vec![map! { "id" => 1, "category" => "uncategorized" }]
    );
    Ok(())
}

#[tokio::test]
async fn lazy_loading_defers_collection_selects() -> Result<()> {
    let memory = Memory::new();
    memory
        .on_query("select id, cat_id from product", product_rows(Value::I32(7)))
        .on_query(
            "select tag from tag where product_id = ?",
            MemoryRowSet::new(["TAG"])
                .row([Value::from("new")])
                .row([Value::from("sale")]),
        );

    let db = SqlMap::builder()
        .settings(Settings {
            lazy_loading_enabled: true,
            ..Settings::default()
        })
        .result_map(product_map(
            ResultMapping::new("tags")
                .column("ID")
                .ty(Type::List)
                .select("loadTags"),
        ))
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(
            MappedStatement::select("loadTags", "select tag from tag where product_id = ?")
                .result_class(Type::String),
        )
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let products = session.query_for_list("getProducts", Value::Null).await?;
    assert_eq!(memory.log().count_sql("from tag"), 0);

    let tags = products[0].expect_object().get("tags")?;
    let lazy = tags.as_lazy().unwrap();
    assert!(!lazy.is_loaded());

    assert_eq!(
        lazy.get().await?,
        &Value::List(vec![Value::from("new"), Value::from("sale")])
    );
    lazy.get().await?;
    assert_eq!(memory.log().count_sql("from tag"), 1);
    Ok(())
}

#[tokio::test]
async fn nested_select_needs_a_result_class() -> Result<()> {
    let memory = Memory::new();
    memory.on_query("select id, cat_id from product", product_rows(Value::I32(7)));

    let mut product_map = ResultMap::builder("ProductMap");
    product_map.mapping(
        ResultMapping::new("category")
            .column("CAT_ID")
            .select("loadCategory"),
    );

    let db = SqlMap::builder()
        .result_map(product_map.build())
        .statement(
            MappedStatement::select("getProducts", "select id, cat_id from product")
                .result_map("ProductMap"),
        )
        .statement(MappedStatement::select("loadCategory", "select * from category where id = ?"))
        .build(memory.clone())
        .await?;

    let session = db.session().await?;
    let err = session
        .query_for_list("getProducts", Value::Null)
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains(
        "The result class was null when trying to get results for ResultMap named ProductMap."
    ));
    Ok(())
}
