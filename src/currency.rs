//! Currency registry and denominated amount display

use crate::theme;
use crate::utils::format_scaled;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry entry for a token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub denomination: Option<u32>,
}

/// Read-only token metadata keyed by token id
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    entries: HashMap<String, CurrencyEntry>,
}

impl CurrencyRegistry {
    pub fn new(entries: HashMap<String, CurrencyEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&CurrencyEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Decimal places an amount is shifted by: the denomination when it is above 1
fn scale_places(denomination: Option<u32>) -> u32 {
    match denomination {
        Some(d) if d > 1 => d,
        _ => 0,
    }
}

/// Scale and format an amount string; unparseable input shows as `0`.
pub fn format_denominated(amount: &str, denomination: Option<u32>) -> String {
    format_scaled(amount, scale_places(denomination)).unwrap_or_else(|| "0".to_string())
}

/// A denominated amount with an optional ticker link to the asset page
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyLine {
    pub amount: String,
    pub currency_id: String,
    pub ticker: Option<String>,
    /// Present when the currency is known to the registry
    pub link: Option<String>,
}

impl CurrencyLine {
    /// Returns `None` when either the amount or the currency is missing.
    pub fn new(
        amount: Option<&str>,
        currency: Option<&str>,
        registry: &CurrencyRegistry,
        asset_base_url: &str,
    ) -> Option<Self> {
        let amount = amount.filter(|a| !a.is_empty())?;
        let currency = currency.filter(|c| !c.is_empty())?;
        let entry = registry.get(currency);

        Some(Self {
            amount: format_denominated(amount, entry.and_then(|e| e.denomination)),
            currency_id: currency.to_string(),
            ticker: entry.and_then(|e| e.ticker.clone()),
            link: entry.map(|_| format!("{}{}", asset_base_url, currency)),
        })
    }

    /// Render the line. Returns the currency id when the ticker link is clicked.
    pub fn show(&self, ui: &mut egui::Ui, callback: Option<&mut dyn FnMut()>) -> Option<String> {
        let mut clicked = None;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = theme::SPACING_SM;
            ui.label(egui::RichText::new(&self.amount).color(theme::TEXT_PRIMARY));
            if let Some(link) = &self.link {
                let text = self.ticker.clone().unwrap_or_default();
                let resp = ui
                    .add(egui::Link::new(
                        egui::RichText::new(text).size(theme::FONT_LABEL).color(theme::ACCENT),
                    ))
                    .on_hover_text(link.as_str());
                if resp.clicked() {
                    if let Some(cb) = callback {
                        cb();
                    }
                    clicked = Some(self.currency_id.clone());
                }
            }
        });
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CurrencyRegistry {
        let mut entries = HashMap::new();
        entries.insert(
            "war".to_string(),
            CurrencyEntry {
                ticker: Some("wAR".into()),
                denomination: Some(3),
            },
        );
        entries.insert(
            "raw".to_string(),
            CurrencyEntry {
                ticker: None,
                denomination: Some(1),
            },
        );
        CurrencyRegistry::new(entries)
    }

    #[test]
    fn scales_when_denomination_above_one() {
        assert_eq!(format_denominated("150000", Some(3)), "150");
        assert_eq!(format_denominated("1234567", Some(3)), "1,234.567");
        assert_eq!(format_denominated("1", Some(12)), "0.000000000001");
    }

    #[test]
    fn leaves_amount_unscaled_at_or_below_one() {
        assert_eq!(format_denominated("150000", Some(1)), "150,000");
        assert_eq!(format_denominated("150000", Some(0)), "150,000");
        assert_eq!(format_denominated("150000", None), "150,000");
    }

    #[test]
    fn scaling_matches_division() {
        use rust_decimal::Decimal;
        use std::str::FromStr;
        for d in 2..=12u32 {
            let amount = Decimal::from(987_654_321_u64);
            let expected = (amount / Decimal::from(10_u64.pow(d))).normalize();
            let shown = format_denominated("987654321", Some(d)).replace(',', "");
            assert_eq!(Decimal::from_str(&shown).unwrap(), expected, "denomination {}", d);
        }
    }

    #[test]
    fn scales_eighteen_decimal_token_amounts() {
        assert_eq!(
            format_denominated("1000000000000000000000000000000", Some(18)),
            "1,000,000,000,000"
        );
        assert_eq!(
            format_denominated("1", Some(30)),
            format!("0.{}1", "0".repeat(29))
        );
    }

    #[test]
    fn malformed_amount_shows_zero() {
        assert_eq!(format_denominated("abc", Some(3)), "0");
    }

    #[test]
    fn line_uses_registry_denomination_and_ticker() {
        let line = CurrencyLine::new(Some("150000"), Some("war"), &registry(), "#/asset/").unwrap();
        assert_eq!(line.amount, "150");
        assert_eq!(line.ticker.as_deref(), Some("wAR"));
        assert_eq!(line.link.as_deref(), Some("#/asset/war"));
    }

    #[test]
    fn unknown_currency_falls_back_to_unscaled() {
        let line = CurrencyLine::new(Some("150000"), Some("other"), &registry(), "#/asset/").unwrap();
        assert_eq!(line.amount, "150,000");
        assert!(line.ticker.is_none());
        assert!(line.link.is_none());
    }

    #[test]
    fn known_currency_without_ticker_still_links() {
        let line = CurrencyLine::new(Some("10"), Some("raw"), &registry(), "#/asset/").unwrap();
        assert_eq!(line.amount, "10");
        assert!(line.ticker.is_none());
        assert_eq!(line.link.as_deref(), Some("#/asset/raw"));
    }

    #[test]
    fn absent_amount_or_currency_renders_nothing() {
        assert!(CurrencyLine::new(None, Some("war"), &registry(), "").is_none());
        assert!(CurrencyLine::new(Some("1"), None, &registry(), "").is_none());
        assert!(CurrencyLine::new(Some(""), Some("war"), &registry(), "").is_none());
    }
}
