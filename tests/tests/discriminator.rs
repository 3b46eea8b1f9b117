use pretty_assertions::assert_eq;
use sqlmap::{
    map,
    stmt::{Type, Value},
    Discriminator, MappedStatement, ResultMap, ResultMapping, SqlMap,
};
use tests::*;

const SCHEMA: &str = "
    create table vehicle (id integer primary key, kind text, wheels integer, hull text);

    insert into vehicle values
        (1, 'car', 4, null),
        (2, 'boat', null, 'steel'),
        (3, 'sled', null, null);
";

fn id() -> ResultMapping {
    ResultMapping::new("id").column("ID").ty(Type::I32)
}

fn kind() -> ResultMapping {
    ResultMapping::new("kind").column("KIND").ty(Type::String)
}

async fn rows_pick_their_sub_map(s: impl Setup) {
    let mut vehicle = ResultMap::builder("VehicleMap");
    vehicle
        .result_class(Type::Map)
        .mapping(id())
        .mapping(kind())
        .discriminator(
            Discriminator::new(kind())
                .sub_map("car", "CarMap")
                .sub_map("boat", "BoatMap"),
        )
        .unwrap();

    let mut car = ResultMap::builder("CarMap");
    car.result_class(Type::Map)
        .mapping(id())
        .mapping(ResultMapping::new("wheels").column("WHEELS").ty(Type::I32));

    let mut boat = ResultMap::builder("BoatMap");
    boat.result_class(Type::Map)
        .mapping(id())
        .mapping(ResultMapping::new("hull").column("HULL").ty(Type::String));

    let mut builder = SqlMap::builder();
    builder
        .result_map(vehicle.build())
        .result_map(car.build())
        .result_map(boat.build())
        .statement(
            MappedStatement::select("getVehicles", "select * from vehicle order by id")
                .result_map("VehicleMap"),
        );

    let db = s.setup(&mut builder, SCHEMA).await;
    let session = db.session().await.unwrap();

    let vehicles = session.query_for_list("getVehicles", Value::Null).await.unwrap();
    assert_eq!(
        vehicles,
        vec![
            map! { "id" => 1, "wheels" => 4 },
            map! { "id" => 2, "hull" => "steel" },
            map! { "id" => 3, "kind" => "sled" },
        ]
    );
}

tests!(rows_pick_their_sub_map);
