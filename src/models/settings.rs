use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub id: i32,
    pub currency: String,
    pub chart_width: u32,
    pub chart_height: u32,
    pub seed_sample_trades: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsInput {
    pub currency: Option<String>,
    pub chart_width: Option<u32>,
    pub chart_height: Option<u32>,
    pub seed_sample_trades: Option<bool>,
}
