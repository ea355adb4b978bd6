use std::{env, fs, ops::Deref, path::Path, str::FromStr, sync::Arc, time::Duration};

use url::Url;

use crate::{
    error::Error,
    handler::aggregator::StatusAggregator,
    provider::HTTP,
};

pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_COIN_ID: &str = "zcash";
pub const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&ids=zcash";

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub status: StatusAggregator<HTTP>,
}

impl State {
    pub fn new(config: Config, http: HTTP) -> State {
        let status = StatusAggregator::new(Arc::new(http), &config);
        Self { config, status }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cache_ttl: u64,
    pub timeout: u64,
    pub price_url: String,
    pub info_url: String,
    pub mempool_url: String,
    pub coin_id: String,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: Option<String>,
    pub cache_warmup: bool,
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl)
    }

    #[cfg(test)]
    pub fn for_tests() -> Config {
        Config {
            cache_ttl: DEFAULT_CACHE_TTL_MS,
            timeout: 2_000,
            price_url: String::from("http://prices.test/markets"),
            info_url: String::from("http://chain.test/info"),
            mempool_url: String::from("https://mempool.test/pending"),
            coin_id: String::from(DEFAULT_COIN_ID),
            server_host: String::from("127.0.0.1"),
            port: 0,
            allowed_origins: vec![String::from("*")],
            static_dir: None,
            cache_warmup: false,
        }
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let cache_ttl = env_or("CACHE_TTL_MS", DEFAULT_CACHE_TTL_MS)?;
    let timeout = env_or("TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

    let price_url = parse_url(
        "PRICE_URL",
        env::var("PRICE_URL").unwrap_or_else(|_| DEFAULT_PRICE_URL.to_owned()),
    )?;
    let info_url = parse_url("INFO_URL", env::var("INFO_URL")?)?;
    let mempool_url = parse_url("MEMPOOL_URL", env::var("MEMPOOL_URL")?)?;
    let coin_id =
        env::var("COIN_ID").unwrap_or_else(|_| DEFAULT_COIN_ID.to_owned());

    let server_host =
        env::var("SERVER_HOST").unwrap_or_else(|_| String::from("0.0.0.0"));
    let port: u16 = env_or("PORT", 3000)?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| String::from("*"))
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect::<Vec<String>>();
    let static_dir = env::var("STATIC_DIRECTORY").ok().map(|dir| {
        format!("{}/{}", env!("CARGO_MANIFEST_DIR"), dir)
    });
    let cache_warmup = env_or("CACHE_WARMUP", true)?;

    if cache_ttl == 0 {
        return Err(Error::ConfigurationError(String::from(
            "CACHE_TTL_MS must be greater than 0",
        )));
    }

    let config = Config {
        cache_ttl,
        timeout,
        price_url,
        info_url,
        mempool_url,
        coin_id,
        server_host,
        port,
        allowed_origins,
        static_dir,
        cache_warmup,
    };

    Ok(config)
}

/// Loads `.env` next to the manifest into the process environment.
/// Variables that are already set are left alone.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    if !Path::new(&path).exists() {
        return Ok(());
    }

    let config_string = fs::read_to_string(path)?;
    for (key, value) in parse_config_string(&config_string) {
        if env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(&str, &str)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

fn env_or<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    match env::var(key) {
        Ok(value) => Ok(value.trim().parse()?),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(Error::VAR(e)),
    }
}

fn parse_url(key: &str, value: String) -> Result<String, Error> {
    let url = Url::parse(&value).map_err(|e| {
        Error::ConfigurationError(format!("{} is not a valid URL: {}", key, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(value),
        scheme => Err(Error::ConfigurationError(format!(
            "{} has unsupported scheme {}",
            key, scheme
        ))),
    }
}
