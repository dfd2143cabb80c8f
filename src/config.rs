//! Environment-derived configuration.
//!
//! Only two knobs exist: where the backend lives, and the public-facing base
//! URL used to build share links. Nothing else in the core depends on the
//! environment.

const BACKEND_URL_VAR: &str = "BACKEND_URL";
const PUBLIC_URL_VAR: &str = "FRONTEND_URL";

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the backend API, e.g. `http://localhost:3000`.
    pub backend_url: String,
    /// Public base URL that share links are built against.
    pub public_url: String,
}

impl Config {
    pub fn new(backend_url: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            public_url: public_url.into(),
        }
    }

    /// Read `BACKEND_URL` / `FRONTEND_URL`, falling back to the local
    /// development defaults.
    pub fn from_env() -> Self {
        let backend_url =
            std::env::var(BACKEND_URL_VAR).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let public_url =
            std::env::var(PUBLIC_URL_VAR).unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string());
        tracing::debug!(%backend_url, %public_url, "Configuration loaded");
        Self { backend_url, public_url }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL, DEFAULT_PUBLIC_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_dev() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:3000");
        assert_eq!(config.public_url, "http://localhost:5173");
    }
}
