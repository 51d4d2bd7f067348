// --- BUDGET CONSTANTS ---
/// Smallest budget a single campaign may carry (₽)
pub const MIN_CAMPAIGN_BUDGET: i64 = 1000;

/// Balance of the unified account that pays for the non-bonus part of every budget (₽)
pub const UNIFIED_BALANCE: i64 = 105_350;

// --- PROMO BONUS CONSTANTS ---
/// Total promo bonuses across all packages (B, 1B = 1₽)
pub const TOTAL_PROMO_BONUS: i64 = 226_660_517;

/// Built-in bonus packages: (id, amount, max percent of a budget, expiry dd.mm.yy, burn label)
pub const BONUS_PACKAGE_CATALOG: [(&str, i64, u8, &str, &str); 2] = [
    ("p1", 209_527_397, 100, "20.03.26", "209.4M"),
    ("p2", 17_133_120, 99, "27.03.26", "168.3k"),
];

// --- MOCK DATA CONSTANTS ---
pub const FALLBACK_RECORD_COUNT: u32 = 70;
pub const FALLBACK_BASE_NM_ID: u64 = 14_029_380;
pub const FALLBACK_CATEGORY: &str = "Платья";
pub const MOCK_PRODUCTS_PER_CATEGORY: u32 = 25;
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/64x64/e2e8f0/94a3b8?text=W";

// --- MANUAL ADD DEFAULTS ---
pub const DEFAULT_CAMPAIGN_BUDGET: i64 = 3000;
pub const DEFAULT_CPM_BID: i64 = 300;
pub const DEFAULT_CPC_BID: i64 = 30;
pub const MANUAL_SOURCE: &str = "Ручное добавление";
