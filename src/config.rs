use std::{env, time::Duration};

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    /// Target of the `/api/proxy/*` rewrite.
    pub trivia_upstream_host: String,
    /// Base URL the fetch layer calls. Point it at `http://<host>:<port>/api/proxy`
    /// to route question fetches through the proxy.
    pub trivia_api_base: String,
    pub question_amount: u32,
    pub advance_delay_ms: u64,
    pub http_timeout_secs: u64,
    pub session_idle_timeout_secs: u64,
    pub session_sweep_interval_secs: u64,
}

pub const DEFAULT_UPSTREAM_HOST: &str = "https://opentdb.com";

impl Config {
    pub fn from_env() -> Self {
        let trivia_upstream_host = env::var("TRIVIA_UPSTREAM_HOST")
            .map(|host| host.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_HOST.to_string());

        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            trivia_api_base: env::var("TRIVIA_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| trivia_upstream_host.clone()),
            trivia_upstream_host,
            question_amount: env::var("QUESTION_AMOUNT")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10),
            advance_delay_ms: env::var("ADVANCE_DELAY_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(1500),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            session_idle_timeout_secs: env::var("SESSION_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1800),
            session_sweep_interval_secs: env::var("SESSION_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(60),
        }
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            trivia_upstream_host: "http://127.0.0.1:9".to_string(),
            trivia_api_base: "http://127.0.0.1:9".to_string(),
            question_amount: 10,
            advance_delay_ms: 1500,
            http_timeout_secs: 1,
            session_idle_timeout_secs: 1800,
            session_sweep_interval_secs: 60,
        }
    }
}
