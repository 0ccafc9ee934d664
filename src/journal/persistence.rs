use crate::db::Database;
use crate::error::AppError;
use crate::models::{Category, Direction, Trade};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

const SAVED_MARKER: &str = "trades_saved";

/// Where the journal lives between runs.
///
/// `save` always receives the whole collection and replaces whatever was
/// stored before.
pub trait TradePersistence {
    /// `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<Trade>>, AppError>;
    fn save(&mut self, trades: &[Trade]) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Option<Vec<Trade>>,
    pub save_count: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self {
            saved: Some(trades),
            save_count: 0,
        }
    }

    pub fn saved(&self) -> Option<&[Trade]> {
        self.saved.as_deref()
    }
}

impl TradePersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Vec<Trade>>, AppError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, trades: &[Trade]) -> Result<(), AppError> {
        self.saved = Some(trades.to_vec());
        self.save_count += 1;
        Ok(())
    }
}

/// A single JSON document on disk, in the browser export format.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TradePersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<Vec<Trade>>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let trades = serde_json::from_str(&content).map_err(|e| {
            AppError::Storage(format!("{} is not a valid journal: {}", self.path.display(), e))
        })?;
        Ok(Some(trades))
    }

    fn save(&mut self, trades: &[Trade]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(trades)?;

        // Write then rename so a crash never leaves a half-written journal.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Journal rows in the `trades` table, kept in insertion order.
pub struct SqlitePersistence<'a> {
    db: &'a Database,
}

impl<'a> SqlitePersistence<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

fn invalid_column(index: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        format!("unexpected value '{}'", value).into(),
    )
}

fn map_row_to_trade(row: &rusqlite::Row) -> rusqlite::Result<Trade> {
    let direction: String = row.get(5)?;
    let category: String = row.get(14)?;

    Ok(Trade {
        id: row.get(0)?,
        date: row.get(1)?,
        entry_time: row.get(2)?,
        exit_time: row.get(3)?,
        asset: row.get(4)?,
        direction: Direction::parse(&direction).ok_or_else(|| invalid_column(5, &direction))?,
        quantity: row.get(6)?,
        entry_price: row.get(7)?,
        exit_price: row.get(8)?,
        charges: row.get(9)?,
        gross_pnl: row.get(10)?,
        net_pnl: row.get(11)?,
        strategy: row.get(12)?,
        entry_reason: row.get(13)?,
        category: Category::parse(&category).ok_or_else(|| invalid_column(14, &category))?,
        exit_reason: row.get(15)?,
        emotion: row.get(16)?,
        lesson: row.get(17)?,
    })
}

impl TradePersistence for SqlitePersistence<'_> {
    fn load(&self) -> Result<Option<Vec<Trade>>, AppError> {
        let conn = self.db.conn.lock().map_err(|e| AppError::Database(e.to_string()))?;

        let saved: i32 = conn.query_row(
            "SELECT COUNT(*) FROM journal_meta WHERE key = ?",
            [SAVED_MARKER],
            |row| row.get(0),
        )?;
        if saved == 0 {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT id, date, entry_time, exit_time, asset, direction, quantity,
                    entry_price, exit_price, charges, gross_pnl, net_pnl, strategy,
                    entry_reason, category, exit_reason, emotion, lesson
             FROM trades ORDER BY position ASC",
        )?;
        let trades = stmt
            .query_map([], map_row_to_trade)?
            .collect::<Result<Vec<Trade>, _>>()?;

        Ok(Some(trades))
    }

    fn save(&mut self, trades: &[Trade]) -> Result<(), AppError> {
        let conn = self.db.conn.lock().map_err(|e| AppError::Database(e.to_string()))?;
        let tx = conn.unchecked_transaction()?;

        tx.execute("DELETE FROM trades", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO trades (
                    id, position, date, entry_time, exit_time, asset, direction, quantity,
                    entry_price, exit_price, charges, gross_pnl, net_pnl, strategy, category,
                    entry_reason, exit_reason, emotion, lesson
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (position, trade) in trades.iter().enumerate() {
                insert.execute(rusqlite::params![
                    trade.id,
                    position as i64,
                    trade.date,
                    trade.entry_time,
                    trade.exit_time,
                    trade.asset,
                    trade.direction.as_str(),
                    trade.quantity,
                    trade.entry_price,
                    trade.exit_price,
                    trade.charges,
                    trade.gross_pnl,
                    trade.net_pnl,
                    trade.strategy,
                    trade.category.as_str(),
                    trade.entry_reason,
                    trade.exit_reason,
                    trade.emotion,
                    trade.lesson,
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO journal_meta (key, value) VALUES (?, ?)",
            rusqlite::params![SAVED_MARKER, Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;
        log::debug!("Persisted {} trades", trades.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_trades;

    #[test]
    fn test_sqlite_reports_never_saved() {
        let db = Database::open_in_memory().unwrap();
        let persistence = SqlitePersistence::new(&db);
        assert!(persistence.load().unwrap().is_none());
    }

    #[test]
    fn test_sqlite_round_trip_keeps_order() {
        let db = Database::open_in_memory().unwrap();
        let mut persistence = SqlitePersistence::new(&db);

        let mut trades = sample_trades();
        trades.reverse();
        persistence.save(&trades).unwrap();

        assert_eq!(persistence.load().unwrap(), Some(trades));
    }

    #[test]
    fn test_sqlite_empty_save_is_remembered() {
        let db = Database::open_in_memory().unwrap();
        let mut persistence = SqlitePersistence::new(&db);
        persistence.save(&sample_trades()).unwrap();
        persistence.save(&[]).unwrap();

        assert_eq!(persistence.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut persistence = JsonFilePersistence::new(dir.path().join("nested").join("trades.json"));

        assert!(persistence.load().unwrap().is_none());
        persistence.save(&sample_trades()).unwrap();
        assert_eq!(persistence.load().unwrap(), Some(sample_trades()));
        assert!(!persistence.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_json_file_rejects_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.json");
        fs::write(&path, "{ not json").unwrap();

        let persistence = JsonFilePersistence::new(path);
        assert!(matches!(persistence.load(), Err(AppError::Storage(_))));
    }
}
