#[cfg(test)]
mod tests {
    use indoc::indoc;
    use skiff::{Entity, GenericSqlWriter, Parameter, SqlWriter, Value};

    #[derive(Entity, Debug, Clone)]
    #[skiff(table = "Vehicle")]
    struct Vehicle {
        #[skiff(primary_key, skip = "create, update")]
        id: i64,
        plate: String,
        capacity: Option<i32>,
        #[skiff(skip = "update")]
        registered_on: time::Date,
    }

    fn make_two() -> [Vehicle; 2] {
        [
            Vehicle {
                id: 1,
                plate: "KA-1234".into(),
                capacity: Some(12),
                registered_on: time::macros::date!(2021 - 03 - 15),
            },
            Vehicle {
                id: 2,
                plate: "KA-5678".into(),
                capacity: None,
                registered_on: time::macros::date!(2023 - 11 - 02),
            },
        ]
    }

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    #[test]
    fn insert_single() {
        let statement = WRITER.insert_into(&make_two()[..1]).unwrap();
        assert_eq!(
            statement.sql,
            r#"INSERT INTO "Vehicle" ("plate", "capacity", "registered_on") VALUES (@plate_1, @capacity_1, @registered_on_1);"#
        );
        assert_eq!(
            statement
                .params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>(),
            ["plate_1", "capacity_1", "registered_on_1"]
        );
        assert_eq!(
            statement.params[0].value,
            Value::Varchar(Some("KA-1234".into()))
        );
    }

    #[test]
    fn insert_batch_suffixes_rows() {
        let statement = WRITER.insert_into(&make_two()).unwrap();
        assert_eq!(
            statement.sql,
            indoc! {r#"
                INSERT INTO "Vehicle" ("plate", "capacity", "registered_on") VALUES (@plate_1, @capacity_1, @registered_on_1);
                INSERT INTO "Vehicle" ("plate", "capacity", "registered_on") VALUES (@plate_2, @capacity_2, @registered_on_2);"#}
        );
        assert_eq!(statement.params.len(), 6);
        assert_eq!(statement.params[4].name, "capacity_2");
        assert_eq!(statement.params[4].value, Value::Int32(None));
    }

    #[test]
    fn insert_empty_slice_is_an_error() {
        assert!(WRITER.insert_into::<Vehicle>(&[]).is_err());
    }

    #[test]
    fn select_all() {
        let statement = WRITER.select_all::<Vehicle>();
        assert_eq!(statement.sql, r#"SELECT * FROM "Vehicle";"#);
        assert!(statement.params.is_empty());
    }

    #[test]
    fn update_sets_non_key_columns() {
        let statement = WRITER.update_by_key(&make_two()[0]).unwrap();
        assert_eq!(
            statement.sql,
            r#"UPDATE "Vehicle" SET "plate" = @plate, "capacity" = @capacity WHERE "id" = @id;"#
        );
        assert_eq!(
            statement
                .params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>(),
            ["plate", "capacity", "id"]
        );
        assert_eq!(statement.params[2].value, Value::Int64(Some(1)));
    }

    #[test]
    fn delete_binds_the_key() {
        let statement = WRITER.delete_by_key(&make_two()[1]).unwrap();
        assert_eq!(statement.sql, r#"DELETE FROM "Vehicle" WHERE "id" = @id;"#);
        assert_eq!(
            statement.params,
            [Parameter::new("id", Value::Int64(Some(2)))]
        );
    }

    #[derive(Entity, Debug, Clone)]
    struct Tag {
        label: String,
    }

    #[test]
    fn update_without_primary_key_is_an_error() {
        let tag = Tag { label: "x".into() };
        assert!(WRITER.update_by_key(&tag).is_err());
        assert!(WRITER.delete_by_key(&tag).is_err());
    }

    #[test]
    fn procedure_call_with_parameters() {
        let statement = WRITER
            .procedure_call(
                "GetDriverRoutes",
                vec![Parameter::new("driverId", 7i64)],
            )
            .unwrap();
        assert_eq!(statement.sql, r#"CALL "GetDriverRoutes"(@driverId);"#);
    }

    #[test]
    fn procedure_name_must_be_a_single_token() {
        assert!(
            WRITER
                .procedure_call("EXEC GetDriverRoutes", Vec::new())
                .is_err()
        );
    }

    #[test]
    fn lookup_select() {
        let statement = WRITER.select_lookup("RouteStatus", "Name", "Id");
        assert_eq!(
            statement.sql,
            r#"SELECT "Id" AS "value", "Name" AS "name" FROM "RouteStatus";"#
        );
    }
}
