#[cfg(test)]
mod tests {
    use skiff::{Entity, Operation, RowLabeled, Value, fields_for, primary_key_value};
    use time::macros::date;

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[skiff(table = "Vehicle")]
    struct Vehicle {
        #[skiff(primary_key, skip = "create, update")]
        id: i64,
        plate: String,
        capacity: Option<i32>,
        #[skiff(name = "OdometerKm")]
        odometer_km: f64,
        #[skiff(skip = "update")]
        registered_on: time::Date,
        #[skiff(ignore)]
        _dirty: bool,
    }

    fn make_one() -> Vehicle {
        Vehicle {
            id: 42,
            plate: "KA-1234".into(),
            capacity: Some(12),
            odometer_km: 15000.5,
            registered_on: date!(2021 - 03 - 15),
            _dirty: false,
        }
    }

    #[test]
    fn descriptor() {
        assert_eq!(Vehicle::table_name(), "Vehicle");

        let columns = Vehicle::columns();
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[1].name, "plate");
        assert_eq!(columns[2].name, "capacity");
        assert_eq!(columns[3].name, "OdometerKm");
        assert_eq!(columns[4].name, "registered_on");
        assert!(columns.iter().all(|c| c.table == "Vehicle"));
        assert!(matches!(columns[0].value, Value::Int64(..)));
        assert!(matches!(columns[1].value, Value::Varchar(..)));
        assert!(matches!(columns[2].value, Value::Int32(..)));
        assert!(matches!(columns[3].value, Value::Float64(..)));
        assert!(matches!(columns[4].value, Value::Date(..)));
        assert!(!columns[0].nullable);
        assert!(columns[2].nullable);
        assert!(columns[0].primary_key);
        assert!(!columns[1].primary_key);
        assert!(!columns[0].included_in(Operation::Create));
        assert!(!columns[0].included_in(Operation::Update));
        assert!(columns[0].included_in(Operation::Retrieve));
        assert!(columns[4].included_in(Operation::Create));
        assert!(!columns[4].included_in(Operation::Update));
    }

    #[test]
    fn primary_key() {
        let key = Vehicle::primary_key_def().unwrap();
        assert_eq!(key.name, "id");
        assert_eq!(
            primary_key_value(&make_one()),
            Some(("id", Value::Int64(Some(42))))
        );
    }

    #[test]
    fn fields_per_operation() {
        let (fields, key) = fields_for::<Vehicle>(Operation::Create, true);
        assert_eq!(
            fields.iter().map(|c| c.name).collect::<Vec<_>>(),
            ["plate", "capacity", "OdometerKm", "registered_on"]
        );
        assert_eq!(key.unwrap().name, "id");

        let (fields, _) = fields_for::<Vehicle>(Operation::Update, true);
        assert_eq!(
            fields.iter().map(|c| c.name).collect::<Vec<_>>(),
            ["plate", "capacity", "OdometerKm"]
        );
    }

    #[test]
    fn row_pairs() {
        let row = make_one().row();
        assert_eq!(row.len(), 5);
        assert_eq!(row[0], ("id", Value::Int64(Some(42))));
        assert_eq!(row[1], ("plate", Value::Varchar(Some("KA-1234".into()))));
        assert_eq!(row[2], ("capacity", Value::Int32(Some(12))));
        assert_eq!(row[3], ("OdometerKm", Value::Float64(Some(15000.5))));
        assert_eq!(
            row[4],
            ("registered_on", Value::Date(Some(date!(2021 - 03 - 15))))
        );
    }

    #[test]
    fn from_row_materializes() {
        let row = RowLabeled::new(
            vec![
                "id".to_string(),
                "plate".to_string(),
                "capacity".to_string(),
                "OdometerKm".to_string(),
                "registered_on".to_string(),
            ]
            .into(),
            vec![
                Value::Int64(Some(42)),
                Value::Varchar(Some("KA-1234".into())),
                Value::Int32(Some(12)),
                Value::Float64(Some(15000.5)),
                Value::Date(Some(date!(2021 - 03 - 15))),
            ]
            .into(),
        );
        let vehicle = Vehicle::from_row(&row).unwrap();
        assert_eq!(vehicle, make_one());
    }

    #[test]
    fn from_row_null_into_option() {
        let row = RowLabeled::new(
            vec![
                "id".to_string(),
                "plate".to_string(),
                "capacity".to_string(),
                "OdometerKm".to_string(),
                "registered_on".to_string(),
            ]
            .into(),
            vec![
                Value::Int64(Some(1)),
                Value::Varchar(Some("X".into())),
                Value::Null,
                Value::Float64(Some(0.0)),
                Value::Date(Some(date!(2020 - 01 - 01))),
            ]
            .into(),
        );
        assert_eq!(Vehicle::from_row(&row).unwrap().capacity, None);
    }

    #[test]
    fn from_row_missing_column_is_an_error() {
        let row = RowLabeled::new(
            vec!["id".to_string()].into(),
            vec![Value::Int64(Some(1))].into(),
        );
        let error = Vehicle::from_row(&row).unwrap_err();
        assert!(format!("{:#}", error).contains("plate"));
    }

    #[derive(Entity, Debug)]
    struct AuditLog {
        #[skiff(primary_key)]
        id: i64,
        message: String,
        #[skiff(skip = "retrieve")]
        raw_payload: String,
    }

    #[test]
    fn retrieve_skipped_field_defaults() {
        let row = RowLabeled::new(
            vec!["id".to_string(), "message".to_string()].into(),
            vec![Value::Int64(Some(7)), Value::Varchar(Some("ok".into()))].into(),
        );
        let log = AuditLog::from_row(&row).unwrap();
        assert_eq!(log.id, 7);
        assert_eq!(log.message, "ok");
        assert_eq!(log.raw_payload, "");
    }

    #[test]
    fn table_name_defaults_to_type_name() {
        assert_eq!(AuditLog::table_name(), "AuditLog");
    }
}
