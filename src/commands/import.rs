use crate::commands::trades::open_journal;
use crate::db::Database;

/// Journal as a pretty JSON array, the same format `import_trades_json` reads.
pub fn export_trades_json(db: &Database) -> Result<String, String> {
    let store = open_journal(db)?;
    store.export_json().map_err(|e| e.to_string())
}

/// Replaces the journal with the trades in `json_data`. A file that does not
/// parse leaves the current journal in place.
pub fn import_trades_json(db: &Database, json_data: &str) -> Result<usize, String> {
    let mut store = open_journal(db)?;
    store.import_json(json_data).map_err(|e| {
        log::error!("Import rejected: {}", e);
        e.to_string()
    })
}

pub fn export_trades_csv(db: &Database) -> Result<String, String> {
    let store = open_journal(db)?;
    store.export_csv().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::trades::get_trades;

    #[test]
    fn test_export_import_between_databases() {
        let source = Database::open_in_memory().unwrap();
        let exported = export_trades_json(&source).unwrap();

        let target = Database::open_in_memory().unwrap();
        crate::commands::trades::delete_all_trades(&target).unwrap();
        assert_eq!(import_trades_json(&target, &exported).unwrap(), 2);
        assert_eq!(get_trades(&target, None).unwrap(), get_trades(&source, None).unwrap());
    }

    #[test]
    fn test_malformed_import_keeps_journal() {
        let db = Database::open_in_memory().unwrap();
        let err = import_trades_json(&db, "not json").unwrap_err();

        assert!(err.starts_with("Error importing data. Please check the file format."));
        assert_eq!(get_trades(&db, None).unwrap().len(), 2);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(import_trades_json(&db, r#"{"trades": []}"#).is_err());
        assert!(import_trades_json(&db, r#"[{"id": "1"}]"#).is_err());
        assert_eq!(get_trades(&db, None).unwrap().len(), 2);
    }

    #[test]
    fn test_repeated_trade_id_is_an_import_error() {
        let db = Database::open_in_memory().unwrap();
        let mut trades = get_trades(&db, None).unwrap();
        trades[1].id = trades[0].id.clone();
        let json = serde_json::to_string_pretty(&trades).unwrap();

        let err = import_trades_json(&db, &json).unwrap_err();
        assert!(err.starts_with("Error importing data. Please check the file format."));
        assert!(!err.contains("UNIQUE"));
        assert_eq!(get_trades(&db, None).unwrap().len(), 2);
    }

    #[test]
    fn test_csv_export() {
        let db = Database::open_in_memory().unwrap();
        let csv = export_trades_csv(&db).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }
}
