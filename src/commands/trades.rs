use crate::commands::settings::get_settings;
use crate::db::Database;
use crate::journal::{SqlitePersistence, TradeDraft, TradeStore};
use crate::models::{sample_trades, Trade, TradeFilters};

/// Opens the journal, seeding the sample trades on first use when the
/// settings allow it.
pub fn open_journal(db: &Database) -> Result<TradeStore<SqlitePersistence<'_>>, String> {
    let settings = get_settings(db)?;
    let persistence = SqlitePersistence::new(db);

    let store = if settings.seed_sample_trades {
        TradeStore::open_or_seed(persistence, sample_trades())
    } else {
        TradeStore::open(persistence)
    };
    store.map_err(|e| e.to_string())
}

pub fn get_trades(db: &Database, filters: Option<TradeFilters>) -> Result<Vec<Trade>, String> {
    let store = open_journal(db)?;
    let filters = filters.unwrap_or_default();
    Ok(store.filtered(&filters).into_iter().cloned().collect())
}

pub fn get_trade(db: &Database, id: String) -> Result<Trade, String> {
    let store = open_journal(db)?;
    store
        .get(&id)
        .cloned()
        .ok_or_else(|| format!("Trade {} not found", id))
}

pub fn create_trade(db: &Database, draft: TradeDraft) -> Result<Trade, String> {
    let trade = draft.submit(None).map_err(|e| e.to_string())?;

    let mut store = open_journal(db)?;
    store.add(trade.clone()).map_err(|e| e.to_string())?;
    log::info!("Created trade {} ({} {})", trade.id, trade.direction, trade.asset);

    Ok(trade)
}

/// Full replacement of an existing trade; P&L is re-derived from the draft.
pub fn update_trade(db: &Database, id: String, draft: TradeDraft) -> Result<Trade, String> {
    let mut store = open_journal(db)?;
    if store.get(&id).is_none() {
        return Err(format!("Trade {} not found", id));
    }

    let trade = draft.submit(Some(&id)).map_err(|e| e.to_string())?;
    store.update(trade.clone()).map_err(|e| e.to_string())?;
    log::info!("Updated trade {}", trade.id);

    Ok(trade)
}

pub fn delete_trade(db: &Database, id: String) -> Result<(), String> {
    let mut store = open_journal(db)?;
    store.delete(&id).map_err(|e| e.to_string())?;
    log::info!("Deleted trade {}", id);
    Ok(())
}

pub fn delete_all_trades(db: &Database) -> Result<usize, String> {
    let mut store = open_journal(db)?;
    let count = store.len();
    store.replace_all(Vec::new()).map_err(|e| e.to_string())?;
    log::warn!("Deleted all {} trades", count);
    Ok(count)
}
