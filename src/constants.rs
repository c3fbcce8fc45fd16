//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Market Activity";

/// Compute unit used for read-only dry runs
pub const DEFAULT_CU_URL: &str = "https://cu.ao-testnet.xyz";
/// Universal content marketplace order-book process
pub const DEFAULT_UCM_PROCESS: &str = "hqdL4AZaFZ0huQHbAsYxdTwG6vpibK7ALWKNzmWaD4Q";
/// Profile registry process
pub const DEFAULT_PROFILE_REGISTRY: &str = "SNy4m-DrqxWl01YqGM4sxI8qCni-58re8uuJLvZPypY";
/// Wrapped AR, the default swap token
pub const DEFAULT_SWAP_TOKEN: &str = "xU9zFkq3X2ZQ6olwNVvr1vUWIjc3kXTWr7xKQD6dh10";
/// Route prefix for asset detail links
pub const DEFAULT_ASSET_BASE_URL: &str = "#/asset/";

/// Events per activity page
pub const ACTIVITY_GROUP_SIZE: usize = 50;
/// Cards per page in the profile asset grid
pub const PROFILE_ASSETS_PAGE_SIZE: usize = 24;

pub const ACTION_GET_ACTIVITY: &str = "Get-Activity";
pub const ACTION_GET_PROFILES: &str = "Get-Metadata-By-ProfileIds";
pub const ACTION_INFO: &str = "Info";
