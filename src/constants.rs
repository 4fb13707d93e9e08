//! Dataset Format Constants
//!
//! Column names and file names of the four input tables.
//!
//! ## Marketing tables (`Facebook.csv`, `Google.csv`, `TikTok.csv`)
//! Required: date, tactic, state, impression, clicks, spend, attributed revenue.
//! Any other column (e.g. `campaign`) is carried through as an extra column.
//!
//! ## Business table (`business.csv`)
//! Required: date, # of orders, total revenue, new customers.

/// Column names shared by the three channel tables
pub mod marketing_column {
    pub const DATE: &str = "date";
    pub const TACTIC: &str = "tactic";
    pub const STATE: &str = "state";
    pub const IMPRESSION: &str = "impression";
    pub const CLICKS: &str = "clicks";
    pub const SPEND: &str = "spend";
    pub const ATTRIBUTED_REVENUE: &str = "attributed revenue";

    /// Tag column added before the union; overwrites any source column of the same name
    pub const PLATFORM: &str = "platform";

    pub const REQUIRED: &[&str] = &[
        DATE,
        TACTIC,
        STATE,
        IMPRESSION,
        CLICKS,
        SPEND,
        ATTRIBUTED_REVENUE,
    ];
}

/// Column names of the business table
pub mod business_column {
    pub const DATE: &str = "date";
    pub const ORDERS: &str = "# of orders";
    pub const TOTAL_REVENUE: &str = "total revenue";
    pub const NEW_CUSTOMERS: &str = "new customers";

    pub const REQUIRED: &[&str] = &[DATE, ORDERS, TOTAL_REVENUE, NEW_CUSTOMERS];
}

/// File name of the business table inside the dataset directory
pub const BUSINESS_FILE: &str = "business.csv";

/// Cell values treated as the "missing" marker, in addition to the empty string
pub const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null"];

/// Accepted date layouts; a trailing time component is stripped before matching
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Blended ROAS above this is reported as "Above Target"
pub const ROAS_TARGET: f64 = 3.0;

/// ROAS that maps to an efficiency score of 100
pub const ROAS_EFFICIENCY_BASELINE: f64 = 4.0;

/// A channel is "expensive" when its CPC exceeds the channel average by this factor
pub const HIGH_CPC_FACTOR: f64 = 1.2;

/// Share of underperforming spend considered movable
pub const REALLOCATION_SHARE: f64 = 0.5;

/// Growth potential above this percentage is a "High Opportunity"
pub const HIGH_OPPORTUNITY_PERCENT: f64 = 50.0;

/// Default generative model for the assistant
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of the generative-language API
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request timeout for the text service
pub const GEMINI_TIMEOUT_SECS: u64 = 60;

/// Returned by the assistant when no credentials are configured
pub const AI_UNAVAILABLE_MESSAGE: &str =
    "AI not available. Please set GEMINI_API_KEY in the environment.";
