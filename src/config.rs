use std::env::VarError;

use anyhow::anyhow;

pub const REQUIRED_VARIABLES: &[&str] = &["API_KEY"];

pub const DEFAULT_LISTEN_PORT: u16 = 8000;
pub const DEFAULT_ORS_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_ORS_PROFILE: &str = "driving-car";

pub struct Config {
    pub api_key: String,
    /// Postgres connection string; the graph is kept in memory when unset.
    pub pg_url: Option<String>,
    pub listen_port: u16,
    pub ors_url: String,
    pub ors_api_key: Option<String>,
    pub ors_profile: String,
}

impl Config {
    pub fn env() -> anyhow::Result<Self> {
        Self::from_vars(|name| std::env::var(name))
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Result<String, VarError>) -> anyhow::Result<Self> {
        let var = |name: &str| env(&lookup, name);
        let optional = |name: &str| optional_env(&lookup, name);

        let api_key = var("API_KEY")?;
        let pg_url = optional("PG_URL")?;

        let listen_port = match optional("LISTEN_PORT")? {
            Some(port) => port
                .parse()
                .map_err(|e| anyhow!("LISTEN_PORT {port} is not a valid port: {e}"))?,
            None => DEFAULT_LISTEN_PORT,
        };

        let ors_url = optional("ORS_URL")?.unwrap_or_else(|| DEFAULT_ORS_URL.to_string());
        let ors_api_key = optional("ORS_API_KEY")?;
        let ors_profile = optional("ORS_PROFILE")?.unwrap_or_else(|| DEFAULT_ORS_PROFILE.to_string());

        Ok(Self {
            api_key,
            pg_url,
            listen_port,
            ors_url,
            ors_api_key,
            ors_profile,
        })
    }

    /// Logs the effective configuration without secrets.
    pub fn log(&self) {
        match &self.pg_url {
            Some(_) => log::info!("config: store = postgres"),
            None => log::info!("config: store = memory (PG_URL not set)"),
        }
        log::info!("config: listen port = {}", self.listen_port);
        log::info!("config: directions = {} ({})", self.ors_url, self.ors_profile);
        if self.ors_api_key.is_none() {
            log::warn!("config: ORS_API_KEY not set, route planning is disabled");
        }
    }
}

fn env(lookup: &impl Fn(&str) -> Result<String, VarError>, name: &str) -> anyhow::Result<String> {
    lookup(name).map_err(|e| match e {
        VarError::NotPresent => anyhow!("{name} not set"),
        VarError::NotUnicode(_) => anyhow!("{name} value is not valid unicode"),
    })
}

fn optional_env(
    lookup: &impl Fn(&str) -> Result<String, VarError>,
    name: &str,
) -> anyhow::Result<Option<String>> {
    match lookup(name) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} value is not valid unicode")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_vars(|name| vars.get(name).cloned().ok_or(VarError::NotPresent))
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("API_KEY", "secret")]).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.pg_url, None);
        assert_eq!(config.listen_port, DEFAULT_LISTEN_PORT);
        assert_eq!(config.ors_url, DEFAULT_ORS_URL);
        assert_eq!(config.ors_profile, DEFAULT_ORS_PROFILE);
        assert_eq!(config.ors_api_key, None);
    }

    #[test]
    fn api_key_is_required() {
        let err = config(&[("PG_URL", "postgres://localhost/lanes")]).err().unwrap();
        assert!(err.to_string().contains("API_KEY not set"));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("API_KEY", "secret"),
            ("PG_URL", "postgres://localhost/lanes"),
            ("LISTEN_PORT", "9000"),
            ("ORS_API_KEY", "ors"),
            ("ORS_PROFILE", "cycling-regular"),
        ])
        .unwrap();

        assert_eq!(config.pg_url.as_deref(), Some("postgres://localhost/lanes"));
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.ors_api_key.as_deref(), Some("ors"));
        assert_eq!(config.ors_profile, "cycling-regular");
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("API_KEY", "secret"), ("LISTEN_PORT", "http")]).is_err());
    }
}
