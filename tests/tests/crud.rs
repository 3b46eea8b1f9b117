use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sqlmap::{
    map,
    statement::{ParameterMap, ParameterMapping},
    stmt::{BeanType, Type, Value},
    MappedStatement, ResultMap, ResultMapping, SqlMap,
};
use tests::*;

const SCHEMA: &str = "
    create table item (
        id integer primary key,
        name text not null,
        qty integer,
        added text
    );
";

fn item_params() -> ParameterMap {
    ParameterMap::new("itemParams")
        .parameter(ParameterMapping::new("id").ty(Type::I32))
        .parameter(ParameterMapping::new("name").ty(Type::String))
        .parameter(ParameterMapping::new("qty").ty(Type::I32).null_value("-1"))
}

fn item_map() -> ResultMap {
    let mut item_map = ResultMap::builder("ItemMap");
    item_map
        .result_class(Type::Map)
        .resource("items.xml")
        .mapping(ResultMapping::new("id").column("ID").ty(Type::I32))
        .mapping(ResultMapping::new("name").column("NAME").ty(Type::String))
        .mapping(ResultMapping::new("qty").column("QTY").ty(Type::I32));
    item_map.build()
}

fn builder() -> sqlmap::Builder {
    let mut builder = SqlMap::builder();
    builder
        .result_map(item_map())
        .statement(
            MappedStatement::insert("addItem", "insert into item (id, name, qty) values (?, ?, ?)")
                .parameter_class(Type::Map)
                .parameter_map(item_params()),
        )
        .statement(
            MappedStatement::update("renameItem", "update item set name = ? where id = ?")
                .resource("items.xml"),
        )
        .statement(MappedStatement::delete("removeSmall", "delete from item where qty < ?"))
        .statement(
            MappedStatement::select("getItem", "select id, name, qty from item where id = ?")
                .resource("items.xml")
                .result_map("ItemMap"),
        )
        .statement(
            MappedStatement::select("getItems", "select id, name, qty from item order by id")
                .result_map("ItemMap"),
        );
    builder
}

async fn insert_then_read_back(s: impl Setup) {
    let db = s.setup(&mut builder(), SCHEMA).await;
    let session = db.session().await.unwrap();

    let inserted = session
        .insert("addItem", map! { "id" => 1, "name" => "bolt", "qty" => 4 })
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let item = session.query_for_object("getItem", Value::I32(1)).await.unwrap();
    assert_eq!(item, Some(map! { "id" => 1, "name" => "bolt", "qty" => 4 }));

    let missing = session.query_for_object("getItem", Value::I32(2)).await.unwrap();
    assert_eq!(missing, None);
}

async fn parameter_sentinel_stores_null(s: impl Setup) {
    let db = s.setup(&mut builder(), SCHEMA).await;
    let session = db.session().await.unwrap();

    session
        .insert("addItem", map! { "id" => 1, "name" => "nut", "qty" => -1 })
        .await
        .unwrap();

    let item = session.query_for_object("getItem", Value::I32(1)).await.unwrap();
    assert_eq!(item, Some(map! { "id" => 1, "name" => "nut", "qty" => Value::Null }));
}

async fn update_and_delete_count_rows(s: impl Setup) {
    let db = s.setup(&mut builder(), SCHEMA).await;
    let session = db.session().await.unwrap();

    for (id, name, qty) in [(1, "bolt", 4), (2, "nut", 1), (3, "gear", 2)] {
        session
            .insert("addItem", map! { "id" => id, "name" => name, "qty" => qty })
            .await
            .unwrap();
    }

    let renamed = session
        .update(
            "renameItem",
            Value::list_from_vec(vec![Value::from("screw"), Value::I32(1)]),
        )
        .await
        .unwrap();
    assert_eq!(renamed, 1);

    let removed = session.delete("removeSmall", Value::I32(3)).await.unwrap();
    assert_eq!(removed, 2);

    let items = session.query_for_list("getItems", Value::Null).await.unwrap();
    assert_eq!(items, vec![map! { "id" => 1, "name" => "screw", "qty" => 4 }]);
}

async fn range_and_row_handler(s: impl Setup) {
    let db = s.setup(&mut builder(), SCHEMA).await;
    let session = db.session().await.unwrap();

    for id in 1..=5 {
        session
            .insert("addItem", map! { "id" => id, "name" => format!("item-{id}"), "qty" => id })
            .await
            .unwrap();
    }

    let page = session
        .query_for_list_range("getItems", Value::Null, 2, Some(2))
        .await
        .unwrap();
    let ids: Vec<_> = page
        .iter()
        .map(|item| item.expect_object().get("id").unwrap())
        .collect();
    assert_eq!(ids, vec![Value::I32(3), Value::I32(4)]);

    let mut names = vec![];
    session
        .query_with_row_handler("getItems", Value::Null, |item: Value| -> sqlmap::Result<()> {
            names.push(item.expect_object().get("name")?);
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(names.len(), 5);
    assert_eq!(names[4], Value::from("item-5"));
}

async fn bean_auto_mapping(s: impl Setup) {
    let item = BeanType::builder("Item")
        .property("id", Type::I64)
        .property("name", Type::String)
        .build();

    let mut builder = builder();
    builder.statement(
        MappedStatement::select("getItemBeans", "select id, name, qty from item order by id")
            .result_class(Type::Bean(item)),
    );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();
    session
        .insert("addItem", map! { "id" => 7, "name" => "washer", "qty" => 9 })
        .await
        .unwrap();

    let beans = session.query_for_list("getItemBeans", Value::Null).await.unwrap();
    assert_eq!(beans.len(), 1);

    let bean = beans[0].expect_object();
    assert!(bean.is_bean());
    assert_eq!(bean.get("id").unwrap(), Value::I64(7));
    assert_eq!(bean.get("name").unwrap(), Value::from("washer"));
}

async fn scalar_result_class(s: impl Setup) {
    let mut builder = builder();
    builder.statement(
        MappedStatement::select("countItems", "select count(*) from item").result_class(Type::I64),
    );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();
    session
        .insert("addItem", map! { "id" => 1, "name" => "bolt", "qty" => 1 })
        .await
        .unwrap();

    let count = session.query_for_object("countItems", Value::Null).await.unwrap();
    assert_eq!(count, Some(Value::I64(1)));
}

async fn timestamps_round_trip(s: impl Setup) {
    let mut stamped = ResultMap::builder("StampMap");
    stamped
        .result_class(Type::Map)
        .mapping(ResultMapping::new("added").column("ADDED").ty(Type::Timestamp));

    let mut builder = builder();
    builder
        .result_map(stamped.build())
        .statement(MappedStatement::update(
            "stamp",
            "update item set added = ? where id = ?",
        ))
        .statement(
            MappedStatement::select("getStamp", "select added from item where id = ?")
                .result_map("StampMap"),
        );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();
    session
        .insert("addItem", map! { "id" => 1, "name" => "bolt", "qty" => 1 })
        .await
        .unwrap();

    let added = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_milli_opt(14, 5, 30, 250)
        .unwrap();
    session
        .update(
            "stamp",
            Value::list_from_vec(vec![Value::Timestamp(added), Value::I32(1)]),
        )
        .await
        .unwrap();

    let stamp = session.query_for_object("getStamp", Value::I32(1)).await.unwrap();
    assert_eq!(stamp, Some(map! { "added" => Value::Timestamp(added) }));
}

async fn failures_carry_context(s: impl Setup) {
    let db = s.setup(&mut builder(), SCHEMA).await;
    let session = db.session().await.unwrap();

    session
        .insert("addItem", map! { "id" => 1, "name" => "bolt", "qty" => 1 })
        .await
        .unwrap();

    // A second item with the same key breaks the primary key.
    let err = session
        .insert("addItem", map! { "id" => 1, "name" => "nut", "qty" => 1 })
        .await
        .unwrap_err();
    assert!(err.is_database());

    let cx = err.error_context().unwrap();
    assert_eq!(cx.object_id.as_deref(), Some("addItem"));
    assert_eq!(cx.activity.as_deref(), Some("executing the mapped statement"));

    // Name is not null.
    let err = session
        .update("renameItem", Value::list_from_vec(vec![Value::Null, Value::I32(1)]))
        .await
        .unwrap_err();
    assert!(err.is_database());
    assert_eq!(
        err.error_context().unwrap().resource.as_deref(),
        Some("items.xml")
    );
}

async fn procedures_are_rejected(s: impl Setup) {
    let mut builder = builder();
    builder.statement(MappedStatement::procedure("nextId", "{call next_id()}"));

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();

    let err = session.call("nextId", Value::Null).await.unwrap_err();
    assert!(err.is_protocol());
}

tests!(
    insert_then_read_back,
    parameter_sentinel_stores_null,
    update_and_delete_count_rows,
    range_and_row_handler,
    bean_auto_mapping,
    scalar_result_class,
    timestamps_round_trip,
    failures_carry_context,
    procedures_are_rejected,
);
