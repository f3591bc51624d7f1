use serde::Deserialize;

/// Runtime settings, read from the process environment (and `.env` if present).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env file loaded: {e}");
        }

        envy::from_env::<Config>()
    }
}
