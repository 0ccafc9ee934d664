use super::trade::Category;
use std::collections::HashSet;

const FNO_STRATEGIES: &[&str] = &[
    "Futures using ST",
    "Iron Fly",
    "Straddle VWAP",
    "Price Action Futures Trades",
    "ADX Option Buying",
    "Price Action Option Buying",
];

const EQUITY_STRATEGIES: &[&str] = &[
    "Swing Trading",
    "Price Action Trades",
    "Long Term Investment",
    "Penny Stocks",
];

/// Fixed category -> strategy mapping used by the entry form and filters.
pub struct StrategyTaxonomy;

impl StrategyTaxonomy {
    pub fn strategies(category: Category) -> &'static [&'static str] {
        match category {
            Category::FuturesAndOptions => FNO_STRATEGIES,
            Category::Equity => EQUITY_STRATEGIES,
        }
    }

    /// First strategy listed under `category`; the form falls back to it
    /// whenever the category changes.
    pub fn default_strategy(category: Category) -> &'static str {
        Self::strategies(category)[0]
    }

    pub fn contains(category: Category, strategy: &str) -> bool {
        Self::strategies(category).contains(&strategy)
    }

    /// Switches a form's category; the strategy always falls back to the
    /// new category's first entry, even when it would also be valid there.
    pub fn on_category_change(
        current: &mut Category,
        strategy: &mut String,
        category: Category,
    ) {
        *current = category;
        *strategy = Self::default_strategy(category).to_string();
    }

    /// Checked once at startup.
    pub fn validate() -> Result<(), String> {
        for category in Category::ALL {
            let strategies = Self::strategies(category);
            if strategies.is_empty() {
                return Err(format!("Category {} has no strategies", category));
            }

            let mut seen = HashSet::new();
            for strategy in strategies {
                if strategy.trim().is_empty() {
                    return Err(format!("Category {} has a blank strategy name", category));
                }
                if !seen.insert(*strategy) {
                    return Err(format!(
                        "Strategy '{}' is listed twice under {}",
                        strategy, category
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_is_valid() {
        assert!(StrategyTaxonomy::validate().is_ok());
    }

    #[test]
    fn test_default_strategy_is_first_entry() {
        assert_eq!(
            StrategyTaxonomy::default_strategy(Category::FuturesAndOptions),
            "Futures using ST"
        );
        assert_eq!(StrategyTaxonomy::default_strategy(Category::Equity), "Swing Trading");
    }

    #[test]
    fn test_category_change_resets_strategy() {
        let mut category = Category::FuturesAndOptions;
        let mut strategy = "Iron Fly".to_string();

        StrategyTaxonomy::on_category_change(&mut category, &mut strategy, Category::Equity);
        assert_eq!(category, Category::Equity);
        assert_eq!(strategy, "Swing Trading");

        strategy = "Penny Stocks".to_string();
        StrategyTaxonomy::on_category_change(&mut category, &mut strategy, Category::Equity);
        assert_eq!(strategy, "Swing Trading");
    }

    #[test]
    fn test_contains_is_scoped_to_category() {
        assert!(StrategyTaxonomy::contains(Category::Equity, "Penny Stocks"));
        assert!(!StrategyTaxonomy::contains(Category::FuturesAndOptions, "Penny Stocks"));
    }
}
