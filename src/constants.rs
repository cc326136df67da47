/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

// Persisted client state keys
pub const TOKEN_KEY: &str = "token";
pub const CREDITS_KEY: &str = "freeCredits";
pub const LANGUAGE_KEY: &str = "preferredLanguage";

// Skin diagnosis credits handed out to a fresh install
pub const DEFAULT_FREE_CREDITS: u32 = 3;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGINATION_WINDOW: u32 = 5;
pub const ARTICLE_PREVIEW_CHARS: usize = 100;

// Shown when a 401 ends the session
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Languages offered by the language selector (code, display name)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("am", "Amharic (አማርኛ)"),
    ("ti", "Tigrinya (ትግርኛ)"),
    ("om", "Oromo (Afaan Oromoo)"),
    ("so", "Somali (Soomaali)"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ar", "Arabic"),
];

pub const DEFAULT_LANGUAGE: &str = "en";
