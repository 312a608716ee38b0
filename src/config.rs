use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of both the session token and the cookie carrying it.
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

fn var_or(keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|k| std::env::var(k).ok())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let secret = std::env::var("JWT_SECRET")
            .or_else(|_| std::env::var("ACCESS_TOKEN_SECRET"))
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt = JwtConfig {
            secret,
            issuer: var_or(&["JWT_ISSUER"], "motorlot"),
            audience: var_or(&["JWT_AUDIENCE"], "motorlot-web"),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60),
            cookie_secure: parse_or("COOKIE_SECURE", false),
        };
        let port = var_or(&["APP_PORT", "PORT"], "5500").parse::<u16>()?;
        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            host: var_or(&["APP_HOST", "HOST"], "0.0.0.0"),
            port,
            jwt,
        })
    }
}
