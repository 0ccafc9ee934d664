use crate::db::Database;
use crate::models::{Settings, UpdateSettingsInput};

pub fn get_settings(db: &Database) -> Result<Settings, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let settings = conn.query_row(
        "SELECT id, currency, chart_width, chart_height, seed_sample_trades, created_at, updated_at FROM settings WHERE id = 1",
        [],
        |row| {
            Ok(Settings {
                id: row.get(0)?,
                currency: row.get(1)?,
                chart_width: row.get(2)?,
                chart_height: row.get(3)?,
                seed_sample_trades: row.get::<_, i32>(4)? == 1,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        },
    ).map_err(|e| e.to_string())?;

    Ok(settings)
}

pub fn update_settings(db: &Database, settings: UpdateSettingsInput) -> Result<Settings, String> {
    if settings.chart_width == Some(0) || settings.chart_height == Some(0) {
        return Err("Chart dimensions must be greater than zero".to_string());
    }
    if let Some(currency) = &settings.currency {
        if currency.trim().is_empty() {
            return Err("Currency symbol cannot be empty".to_string());
        }
    }

    {
        let conn = db.conn.lock().map_err(|e| e.to_string())?;

        // Build dynamic UPDATE query
        let mut updates = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(val) = settings.currency {
            updates.push("currency = ?");
            values.push(Box::new(val));
        }
        if let Some(val) = settings.chart_width {
            updates.push("chart_width = ?");
            values.push(Box::new(val));
        }
        if let Some(val) = settings.chart_height {
            updates.push("chart_height = ?");
            values.push(Box::new(val));
        }
        if let Some(val) = settings.seed_sample_trades {
            updates.push("seed_sample_trades = ?");
            values.push(Box::new(val as i32));
        }

        updates.push("updated_at = strftime('%s', 'now')");

        let query = format!("UPDATE settings SET {} WHERE id = 1", updates.join(", "));
        let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

        conn.execute(&query, params.as_slice()).map_err(|e| e.to_string())?;
    }

    get_settings(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let db = Database::open_in_memory().unwrap();
        let settings = get_settings(&db).unwrap();
        assert_eq!(settings.currency, "₹");
        assert_eq!(settings.chart_width, 800);
        assert_eq!(settings.chart_height, 200);
        assert!(settings.seed_sample_trades);
    }

    #[test]
    fn test_partial_update() {
        let db = Database::open_in_memory().unwrap();
        let updated = update_settings(
            &db,
            UpdateSettingsInput {
                chart_height: Some(300),
                seed_sample_trades: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.chart_height, 300);
        assert_eq!(updated.chart_width, 800);
        assert!(!updated.seed_sample_trades);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let db = Database::open_in_memory().unwrap();
        let result = update_settings(
            &db,
            UpdateSettingsInput {
                chart_width: Some(0),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(get_settings(&db).unwrap().chart_width, 800);
    }
}
