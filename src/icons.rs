use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use axum::{extract::State, http::StatusCode, Json};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Trailing parenthesized group of a file stem, e.g. the `BTC` in
/// `Bitcoin (BTC)`. Anchored so only the last group counts.
static SYMBOL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)$").unwrap());

/// One icon file in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IconAsset {
    pub display_name: String,
    pub name: String,
    pub symbol: Option<String>,
    pub file_name: String,
    pub path: String,
}

/// Derives the ticker symbol from an icon file stem.
///
/// `Bitcoin (BTC)` yields `BTC`; a stem without a trailing parenthesized
/// group yields the whole stem uppercased. Always produces a symbol.
pub fn extract_symbol(stem: &str) -> String {
    match SYMBOL_SUFFIX.captures(stem) {
        Some(caps) => caps[1].trim().to_uppercase(),
        None => stem.trim().to_uppercase(),
    }
}

fn display_name(stem: &str) -> String {
    SYMBOL_SUFFIX.replace(stem, "").trim_end().to_string()
}

/// Reads the icon directory and builds the catalog, one asset per `.svg`
/// file. Directory order is whatever the filesystem returns; callers that
/// care sort on display name.
pub fn scan_icon_dir(dir: &Path) -> io::Result<Vec<IconAsset>> {
    let mut assets = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();

        let Some(stem) = file_name.strip_suffix(".svg") else {
            continue;
        };

        assets.push(IconAsset {
            display_name: display_name(stem),
            name: stem.to_string(),
            symbol: Some(extract_symbol(stem)),
            path: format!("/icons/{}", file_name),
            file_name,
        });
    }

    Ok(assets)
}

/// Deduplicated symbol universe for the active-set refresh.
pub fn icon_symbols(dir: &Path) -> io::Result<Vec<String>> {
    let symbols: BTreeSet<String> = scan_icon_dir(dir)?
        .into_iter()
        .filter_map(|asset| asset.symbol)
        .collect();

    Ok(symbols.into_iter().collect())
}

/// Like [`icon_symbols`], but restricted to alphanumeric tickers — the
/// upstream map endpoint rejects anything else.
pub fn query_symbols(dir: &Path) -> io::Result<Vec<String>> {
    let symbols = icon_symbols(dir)?
        .into_iter()
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
        .collect();

    Ok(symbols)
}

pub async fn list_icons(
    State(state): State<AppState>,
) -> Result<Json<Vec<IconAsset>>, (StatusCode, String)> {
    let mut assets = scan_icon_dir(&state.icons_dir).map_err(|e| {
        tracing::error!("Failed to read icon directory: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read icons: {}", e),
        )
    })?;

    assets.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    Ok(Json(assets))
}
