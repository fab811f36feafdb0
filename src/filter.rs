use crate::icons::IconAsset;
use crate::market::MarketView;

/// User-facing filter state: free-text search plus the two membership
/// toggles.
#[derive(Debug, Default, Clone)]
pub struct FilterOptions {
    pub query: String,
    pub top100_only: bool,
    pub active_only: bool,
}

/// Applies search, then the top-100 filter, then the active filter.
///
/// A membership stage runs only when its toggle is on AND its backing
/// snapshot loaded; without data the stage is a pass-through, so an outage
/// can never blank the whole catalog. Icons without a symbol are dropped by
/// a membership stage that does run.
pub fn filter_icons<'a>(
    icons: &'a [IconAsset],
    options: &FilterOptions,
    view: &MarketView,
) -> Vec<&'a IconAsset> {
    let mut filtered: Vec<&IconAsset> = icons.iter().collect();

    let query = options.query.trim().to_lowercase();
    if !query.is_empty() {
        filtered.retain(|icon| {
            icon.display_name.to_lowercase().contains(&query)
                || icon.name.to_lowercase().contains(&query)
                || icon
                    .symbol
                    .as_ref()
                    .is_some_and(|s| s.to_lowercase().contains(&query))
        });
    }

    if options.top100_only && view.has_listing() {
        filtered.retain(|icon| {
            icon.symbol
                .as_ref()
                .is_some_and(|symbol| view.is_top100(symbol))
        });
    }

    if options.active_only && view.has_active_set() {
        filtered.retain(|icon| {
            icon.symbol
                .as_ref()
                .is_some_and(|symbol| view.is_active(symbol))
        });
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{ActiveSymbolSet, Coin, MarketSnapshot};

    fn icon(display_name: &str, symbol: Option<&str>) -> IconAsset {
        let file_name = match symbol {
            Some(symbol) => format!("{} ({}).svg", display_name, symbol),
            None => format!("{}.svg", display_name),
        };

        IconAsset {
            display_name: display_name.to_string(),
            name: file_name.trim_end_matches(".svg").to_string(),
            symbol: symbol.map(|s| s.to_string()),
            path: format!("/icons/{}", file_name),
            file_name,
        }
    }

    fn catalog() -> Vec<IconAsset> {
        vec![
            icon("Bitcoin", Some("BTC")),
            icon("Ethereum", Some("ETH")),
            icon("Old Logo", None),
        ]
    }

    fn listing(symbols: &[&str]) -> MarketSnapshot {
        MarketSnapshot {
            coins: symbols
                .iter()
                .enumerate()
                .map(|(i, s)| Coin {
                    id: i as u64 + 1,
                    name: s.to_string(),
                    symbol: s.to_string(),
                    rank: i as u32 + 1,
                    is_active: None,
                })
                .collect(),
            timestamp: 0,
        }
    }

    fn active_set(symbols: &[&str]) -> ActiveSymbolSet {
        ActiveSymbolSet {
            active_symbols: symbols.iter().map(|s| s.to_string()).collect(),
            timestamp: 0,
            total_checked: symbols.len(),
            api_calls_made: 0,
        }
    }

    #[test]
    fn no_filters_passes_everything_through() {
        let icons = catalog();
        let result = filter_icons(&icons, &FilterOptions::default(), &MarketView::default());

        assert_eq!(result.len(), icons.len());
    }

    #[test]
    fn search_matches_symbol_case_insensitively() {
        let icons = catalog();
        let options = FilterOptions {
            query: "btc".to_string(),
            ..FilterOptions::default()
        };

        let result = filter_icons(&icons, &options, &MarketView::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Bitcoin");
    }

    #[test]
    fn search_matches_display_name() {
        let icons = catalog();
        let options = FilterOptions {
            query: "ether".to_string(),
            ..FilterOptions::default()
        };

        let result = filter_icons(&icons, &options, &MarketView::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Ethereum");
    }

    #[test]
    fn top100_stage_uses_listing_membership() {
        let icons = catalog();
        let view = MarketView::from_snapshots(Some(listing(&["BTC"])), None);
        let options = FilterOptions {
            top100_only: true,
            ..FilterOptions::default()
        };

        let result = filter_icons(&icons, &options, &view);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Bitcoin");
    }

    #[test]
    fn active_stage_uses_set_membership() {
        let icons = catalog();
        let view = MarketView::from_snapshots(None, Some(active_set(&["BTC"])));
        let options = FilterOptions {
            active_only: true,
            ..FilterOptions::default()
        };

        let result = filter_icons(&icons, &options, &view);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Bitcoin");
    }

    #[test]
    fn membership_stage_without_data_is_a_pass_through() {
        let icons = catalog();
        let options = FilterOptions {
            top100_only: true,
            active_only: true,
            ..FilterOptions::default()
        };

        // No snapshots loaded: toggles have no effect, nothing is hidden.
        let result = filter_icons(&icons, &options, &MarketView::default());
        assert_eq!(result.len(), icons.len());
    }

    #[test]
    fn stages_compose_in_order() {
        let icons = catalog();
        let view = MarketView::from_snapshots(
            Some(listing(&["BTC", "ETH"])),
            Some(active_set(&["ETH"])),
        );
        let options = FilterOptions {
            query: "e".to_string(),
            top100_only: true,
            active_only: true,
        };

        let result = filter_icons(&icons, &options, &view);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Ethereum");
    }

    #[test]
    fn symbolless_icons_are_dropped_by_an_applied_stage() {
        let icons = catalog();
        let view = MarketView::from_snapshots(Some(listing(&["BTC", "ETH"])), None);
        let options = FilterOptions {
            top100_only: true,
            ..FilterOptions::default()
        };

        let result = filter_icons(&icons, &options, &view);
        assert!(result.iter().all(|icon| icon.symbol.is_some()));
    }
}
