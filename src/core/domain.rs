use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/books.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    // json file holding the catalog
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Configuration {
    pub fn new<P: Into<PathBuf>>(data_path: P) -> Self {
        Configuration {
            data_path: data_path.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Reads `BOOKS_DB`, `HOST` and `PORT`, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let data_path = env::var("BOOKS_DB").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
        Configuration {
            data_path: PathBuf::from(data_path),
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
