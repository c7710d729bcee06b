/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Source defaults
pub const DEFAULT_STREAMS_URL: &str =
    "https://raw.githubusercontent.com/LITUATUI/M3UPT/refs/heads/main/M3U/M3UPT.m3u";
pub const DEFAULT_STREAMS_CACHE: &str = "pt.m3u";
pub const DEFAULT_REFERENCE_CACHE: &str = "channels.csv";

// Catalog defaults
pub const DEFAULT_COUNTRY: &str = "PT";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:134.0) Gecko/20100101 Firefox/134.0";
pub const DEFAULT_PRIORITY_PREFIXES: &[&str] = &["rtp", "sic", "artv", "tvi", "cnn"];

// Logo defaults
pub const DEFAULT_LOGOS_ENABLED: bool = true;
pub const DEFAULT_LOGO_DIRECTORY: &str = "./public/logos";

// Output defaults
pub const DEFAULT_CHANNELS_PATH: &str = "./public/channels.json";

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// HTTP client defaults
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
