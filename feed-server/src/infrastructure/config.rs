use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    /// How long aggregates may be served before recomputation; `None` means
    /// until invalidated.
    pub aggregate_cache_ttl: Option<Duration>,
    pub invalidate_aggregates_on_write: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            lookup("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let aggregate_cache_ttl = match lookup("AGGREGATE_CACHE_TTL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid AGGREGATE_CACHE_TTL_SECS: {}", e))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };
        let invalidate_aggregates_on_write = match lookup("INVALIDATE_AGGREGATES_ON_WRITE") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                anyhow::anyhow!("invalid INVALIDATE_AGGREGATES_ON_WRITE: {}", raw)
            })?,
            None => false,
        };

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            aggregate_cache_ttl,
            invalidate_aggregates_on_write,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
