use std::collections::HashSet;

use super::persistence::TradePersistence;
use crate::error::AppError;
use crate::models::{Trade, TradeFilters};

/// The trade journal. Every mutation writes the full collection through the
/// persistence port and only takes effect in memory once that write succeeded.
pub struct TradeStore<P: TradePersistence> {
    trades: Vec<Trade>,
    persistence: P,
}

impl<P: TradePersistence> TradeStore<P> {
    /// Loads whatever was saved; an untouched store starts empty.
    pub fn open(persistence: P) -> Result<Self, AppError> {
        let trades = persistence.load()?.unwrap_or_default();
        Ok(Self { trades, persistence })
    }

    /// Like [`TradeStore::open`], but a store that was never written starts
    /// with `seed` and saves it straight away.
    pub fn open_or_seed(persistence: P, seed: Vec<Trade>) -> Result<Self, AppError> {
        match persistence.load()? {
            Some(trades) => Ok(Self { trades, persistence }),
            None => {
                log::info!("No saved journal found, seeding {} sample trades", seed.len());
                let mut store = Self {
                    trades: Vec::new(),
                    persistence,
                };
                store.commit(seed)?;
                Ok(store)
            }
        }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn filtered(&self, filters: &TradeFilters) -> Vec<&Trade> {
        self.trades.iter().filter(|t| filters.matches(t)).collect()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn commit(&mut self, next: Vec<Trade>) -> Result<(), AppError> {
        self.persistence.save(&next)?;
        self.trades = next;
        Ok(())
    }

    pub fn add(&mut self, trade: Trade) -> Result<(), AppError> {
        if self.get(&trade.id).is_some() {
            return Err(AppError::Duplicate(format!("Trade {}", trade.id)));
        }
        let mut next = self.trades.clone();
        next.push(trade);
        self.commit(next)
    }

    /// Replaces the trade with the same id, keeping its position.
    pub fn update(&mut self, trade: Trade) -> Result<(), AppError> {
        let index = self
            .trades
            .iter()
            .position(|t| t.id == trade.id)
            .ok_or_else(|| AppError::NotFound(format!("Trade {}", trade.id)))?;
        let mut next = self.trades.clone();
        next[index] = trade;
        self.commit(next)
    }

    pub fn delete(&mut self, id: &str) -> Result<Trade, AppError> {
        let index = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Trade {}", id)))?;
        let mut next = self.trades.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn replace_all(&mut self, trades: Vec<Trade>) -> Result<(), AppError> {
        self.commit(trades)
    }

    /// Pretty JSON array, the same shape `import_json` accepts.
    pub fn export_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.trades)?)
    }

    /// Replaces the journal with the trades in `json`. Anything that does not
    /// parse as a trade array, or repeats a trade id, is rejected and the
    /// journal is left untouched.
    pub fn import_json(&mut self, json: &str) -> Result<usize, AppError> {
        let imported: Vec<Trade> =
            serde_json::from_str(json).map_err(|e| AppError::Import(e.to_string()))?;

        let mut seen = HashSet::with_capacity(imported.len());
        if let Some(dup) = imported.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(AppError::Import(format!("Trade id {} appears more than once", dup.id)));
        }

        let count = imported.len();
        self.commit(imported)?;
        log::info!("Imported {} trades", count);
        Ok(count)
    }

    pub fn export_csv(&self) -> Result<String, AppError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for trade in &self.trades {
            writer.serialize(trade)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AppError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::persistence::MemoryPersistence;
    use crate::models::sample_trades;

    fn seeded() -> TradeStore<MemoryPersistence> {
        TradeStore::open_or_seed(MemoryPersistence::new(), sample_trades()).unwrap()
    }

    #[test]
    fn test_seed_only_applies_to_fresh_storage() {
        let store = seeded();
        assert_eq!(store.len(), 2);
        assert_eq!(store.persistence().save_count, 1);

        let store = TradeStore::open_or_seed(MemoryPersistence::with_trades(Vec::new()), sample_trades())
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_every_mutation_persists_full_collection() {
        let mut store = seeded();

        let mut trade = store.trades()[0].clone();
        trade.id = "3".to_string();
        store.add(trade.clone()).unwrap();
        assert_eq!(store.persistence().saved().unwrap().len(), 3);

        trade.lesson = "Updated lesson".to_string();
        store.update(trade).unwrap();
        assert_eq!(store.get("3").unwrap().lesson, "Updated lesson");
        assert_eq!(store.trades()[2].id, "3");

        store.delete("1").unwrap();
        let saved = store.persistence().saved().unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|t| t.id != "1"));
        assert_eq!(store.persistence().save_count, 4);
    }

    #[test]
    fn test_duplicate_and_missing_ids_are_rejected() {
        let mut store = seeded();
        let existing = store.trades()[0].clone();
        assert!(matches!(store.add(existing), Err(AppError::Duplicate(_))));

        let mut unknown = store.trades()[0].clone();
        unknown.id = "missing".to_string();
        assert!(matches!(store.update(unknown), Err(AppError::NotFound(_))));
        assert!(matches!(store.delete("missing"), Err(AppError::NotFound(_))));
        assert_eq!(store.persistence().save_count, 1);
    }

    #[test]
    fn test_export_then_import_is_identity() {
        let mut store = seeded();
        let exported = store.export_json().unwrap();

        let mut other = TradeStore::open(MemoryPersistence::new()).unwrap();
        assert_eq!(other.import_json(&exported).unwrap(), 2);
        assert_eq!(other.trades(), store.trades());

        store.import_json(&exported).unwrap();
        assert_eq!(store.export_json().unwrap(), exported);
    }

    #[test]
    fn test_malformed_import_preserves_state() {
        let mut store = seeded();
        let before = store.trades().to_vec();

        let result = store.import_json("[{\"id\": \"1\"");
        assert!(matches!(result, Err(AppError::Import(_))));
        assert_eq!(store.trades(), before.as_slice());
        assert_eq!(store.persistence().save_count, 1);
    }

    #[test]
    fn test_import_with_repeated_id_is_rejected() {
        let mut store = seeded();
        let before = store.trades().to_vec();

        let mut trades = before.clone();
        trades[1].id = trades[0].id.clone();
        let json = serde_json::to_string(&trades).unwrap();

        match store.import_json(&json) {
            Err(AppError::Import(message)) => assert!(message.contains(&trades[0].id)),
            other => panic!("expected import error, got {:?}", other),
        }
        assert_eq!(store.trades(), before.as_slice());
        assert_eq!(store.persistence().save_count, 1);
    }

    #[test]
    fn test_filtered_by_strategy() {
        let store = seeded();
        let filters = TradeFilters {
            category: None,
            strategy: Some("Futures using ST".to_string()),
        };
        let matched = store.filtered(&filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].asset, "NIFTY");
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let csv = seeded().export_csv().unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,date,entryTime,exitTime,asset,type,"));
        assert!(header.contains("grossPnL,netPnL"));
        assert_eq!(lines.count(), 2);
        assert!(csv.contains("BANKNIFTY,Short"));
    }
}
