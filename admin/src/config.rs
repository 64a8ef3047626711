use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub remote_api_url: String,
    pub jwt_secret: String,
    pub listen_addr: String,
    pub cors_origins: Vec<String>,
    /// Where unauthenticated callers are sent.
    pub auth_redirect_to: String,
    pub remote_timeout_secs: u64,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters for security");
        }
        if jwt_secret.contains("change_me") {
            anyhow::bail!("JWT_SECRET contains placeholder value, set a real secret before running");
        }

        let remote_api_url =
            std::env::var("REMOTE_API_URL").context("REMOTE_API_URL must be set")?;
        if !remote_api_url.starts_with("http://") && !remote_api_url.starts_with("https://") {
            anyhow::bail!("REMOTE_API_URL must be an http(s) URL");
        }

        Ok(Self {
            remote_api_url,
            jwt_secret,
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            auth_redirect_to: std::env::var("AUTH_REDIRECT_TO").unwrap_or_else(|_| "/".into()),
            remote_timeout_secs: std::env::var("REMOTE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .context("REMOTE_TIMEOUT_SECS must be a number")?,
            log_json: std::env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}
