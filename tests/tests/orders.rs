use pretty_assertions::assert_eq;
use sqlmap::{
    map,
    statement::{ParameterMap, ParameterMapping},
    stmt::{Type, Value},
    MappedStatement, ResultMap, ResultMapping, Settings, SqlMap,
};
use tests::*;

const SCHEMA: &str = "
    create table orders (id integer primary key, customer text not null);
    create table line (
        id integer primary key,
        order_id integer not null,
        descr text not null,
        qty integer
    );

    insert into orders values (1, 'ann'), (2, 'bob'), (3, 'cy');
    insert into line values
        (10, 1, 'bolt', 4),
        (11, 1, 'nut', null),
        (12, 2, 'gear', 1);
";

/// Lines read with a null sentinel for `qty`. A sentinel makes every row
/// carry data, so maps nested over outer joins leave it out.
fn line_map(qty_sentinel: Option<&str>) -> ResultMap {
    let mut qty = ResultMapping::new("qty").column("QTY").ty(Type::I32);
    if let Some(sentinel) = qty_sentinel {
        qty = qty.null_value(sentinel);
    }

    let mut line_map = ResultMap::builder("LineMap");
    line_map
        .result_class(Type::Map)
        .mapping(ResultMapping::new("descr").column("DESCR").ty(Type::String))
        .mapping(qty);
    line_map.build()
}

fn expected_orders(missing_qty: Value) -> Vec<Value> {
    vec![
        map! {
            "orderId" => 1,
            "customer" => "ann",
            "lines" => Value::list_from_vec(vec![
                map! { "descr" => "bolt", "qty" => 4 },
                map! { "descr" => "nut", "qty" => missing_qty },
            ]),
        },
        map! {
            "orderId" => 2,
            "customer" => "bob",
            "lines" => Value::list_from_vec(vec![map! { "descr" => "gear", "qty" => 1 }]),
        },
        map! {
            "orderId" => 3,
            "customer" => "cy",
            "lines" => Value::list_from_vec(vec![]),
        },
    ]
}

async fn joined_orders(s: impl Setup) {
    let mut order_map = ResultMap::builder("OrderMap");
    order_map
        .result_class(Type::Map)
        .group_by("orderId")
        .mapping(ResultMapping::new("orderId").column("ORDER_ID").ty(Type::I32))
        .mapping(ResultMapping::new("customer").column("CUSTOMER").ty(Type::String))
        .mapping(ResultMapping::new("lines").result_map("LineMap"));

    let mut builder = SqlMap::builder();
    builder
        .result_map(line_map(None))
        .result_map(order_map.build())
        .statement(
            MappedStatement::select(
                "getOrders",
                "select o.id as order_id, o.customer, l.descr, l.qty
                 from orders o left join line l on l.order_id = o.id
                 order by o.id, l.id",
            )
            .result_map("OrderMap"),
        );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();

    let orders = session.query_for_list("getOrders", Value::Null).await.unwrap();
    assert_eq!(orders, expected_orders(Value::Null));
}

async fn nested_select_orders(s: impl Setup) {
    let mut order_map = ResultMap::builder("OrderMap");
    order_map
        .result_class(Type::Map)
        .mapping(ResultMapping::new("orderId").column("ORDER_ID").ty(Type::I32))
        .mapping(ResultMapping::new("customer").column("CUSTOMER").ty(Type::String))
        .mapping(
            ResultMapping::new("lines")
                .column("ORDER_ID")
                .ty(Type::List)
                .select("getLines"),
        );

    let mut builder = SqlMap::builder();
    builder
        .result_map(line_map(Some("0")))
        .result_map(order_map.build())
        .statement(
            MappedStatement::select(
                "getOrders",
                "select id as order_id, customer from orders order by id",
            )
            .result_map("OrderMap"),
        )
        .statement(
            MappedStatement::select(
                "getLines",
                "select descr, qty from line where order_id = ? order by id",
            )
            .parameter_class(Type::I32)
            .result_map("LineMap"),
        );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();

    let orders = session.query_for_list("getOrders", Value::Null).await.unwrap();
    assert_eq!(orders, expected_orders(Value::I32(0)));
}

async fn lazy_lines(s: impl Setup) {
    let mut order_map = ResultMap::builder("OrderMap");
    order_map
        .result_class(Type::Map)
        .mapping(ResultMapping::new("orderId").column("ORDER_ID").ty(Type::I32))
        .mapping(
            ResultMapping::new("lines")
                .column("ORDER_ID")
                .ty(Type::List)
                .select("getLines"),
        );

    let mut builder = SqlMap::builder();
    builder
        .settings(Settings {
            lazy_loading_enabled: true,
            ..Settings::default()
        })
        .result_map(line_map(Some("0")))
        .result_map(order_map.build())
        .statement(
            MappedStatement::select("getOrder", "select id as order_id from orders where id = ?")
                .result_map("OrderMap"),
        )
        .statement(
            MappedStatement::select(
                "getLines",
                "select descr, qty from line where order_id = ? order by id",
            )
            .parameter_class(Type::I32)
            .result_map("LineMap"),
        );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();

    let order = session
        .query_for_object("getOrder", Value::I32(2))
        .await
        .unwrap()
        .unwrap();

    let lines = order.expect_object().get("lines").unwrap();
    let lazy = lines.as_lazy().unwrap();
    assert!(!lazy.is_loaded());

    assert_eq!(
        lazy.get().await.unwrap(),
        &Value::list_from_vec(vec![map! { "descr" => "gear", "qty" => 1 }])
    );
    assert!(lazy.is_loaded());
}

async fn composite_nested_parameters(s: impl Setup) {
    let mut order_map = ResultMap::builder("OrderMap");
    order_map
        .result_class(Type::Map)
        .mapping(ResultMapping::new("orderId").column("ORDER_ID").ty(Type::I32))
        .mapping(
            ResultMapping::new("bigLines")
                .column("{orderId=ORDER_ID, minQty=MIN_QTY}")
                .ty(Type::List)
                .select("getBigLines"),
        );

    let mut builder = SqlMap::builder();
    builder
        .result_map(line_map(Some("0")))
        .result_map(order_map.build())
        .statement(
            MappedStatement::select(
                "getOrders",
                "select id as order_id, 2 as min_qty from orders where id = 1",
            )
            .result_map("OrderMap"),
        )
        .statement(
            MappedStatement::select(
                "getBigLines",
                "select descr, qty from line where order_id = ? and qty >= ?",
            )
            .parameter_class(Type::Map)
            .parameter_map(
                ParameterMap::new("bigLineParams")
                    .parameter(ParameterMapping::new("orderId").ty(Type::I32))
                    .parameter(ParameterMapping::new("minQty").ty(Type::I32)),
            )
            .result_map("LineMap"),
        );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();

    let orders = session.query_for_list("getOrders", Value::Null).await.unwrap();
    assert_eq!(
        orders,
        vec![map! {
            "orderId" => 1,
            "bigLines" => Value::list_from_vec(vec![map! { "descr" => "bolt", "qty" => 4 }]),
        }]
    );
}

tests!(
    joined_orders,
    nested_select_orders,
    lazy_lines,
    composite_nested_parameters,
);
