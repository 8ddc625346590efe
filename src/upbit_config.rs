use std::time::Duration;

pub const UPBIT_API_URL: &str = "https://api.upbit.com/v1";
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("upbit-rsi-alert/", env!("CARGO_PKG_VERSION"));

/// HTTP endpoints used by one run.
#[derive(Clone, Debug, PartialEq)]
pub struct UpbitConfig {
    pub api_url: String,
    pub telegram_url: String,
    pub timeout: Duration,
}

impl UpbitConfig {
    // Public endpoints
    pub fn mainnet_default() -> Self {
        Self {
            api_url: UPBIT_API_URL.to_string(),
            telegram_url: TELEGRAM_API_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    // Alternative constructor for proxies and test servers
    pub fn custom(api_url: String, telegram_url: String, timeout: Duration) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            telegram_url: telegram_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn create_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
    }

    pub fn candles_url(&self, timeframe_minutes: u32) -> String {
        format!("{}/candles/minutes/{}", self.api_url, timeframe_minutes)
    }

    pub fn markets_url(&self) -> String {
        format!("{}/market/all", self.api_url)
    }
}

impl Default for UpbitConfig {
    fn default() -> Self {
        Self::mainnet_default()
    }
}
