//! UI strings, handed to views by reference

#[derive(Debug, Clone)]
pub struct Language {
    pub interactions: &'static str,
    pub no_activity: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub updating: &'static str,
    pub showing: &'static str,
    pub assets: &'static str,
    pub no_assets: &'static str,
    pub open_asset: &'static str,
    pub open_profile: &'static str,
    pub back: &'static str,
    pub order_details: &'static str,
    pub search_hint: &'static str,
}

impl Language {
    pub fn english() -> Self {
        Self {
            interactions: "Interactions",
            no_activity: "No activity found",
            previous: "Previous",
            next: "Next",
            updating: "Updating",
            showing: "Showing",
            assets: "Assets",
            no_assets: "No assets found",
            open_asset: "Open asset",
            open_profile: "Open profile",
            back: "Back",
            order_details: "Order details",
            search_hint: "Asset id or address",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}
