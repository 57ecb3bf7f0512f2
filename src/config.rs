use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::client::SuggestionClient;
use crate::fallback::FallbackCatalog;
use crate::normalize::IdFallback;

pub const LOCAL_CONFIG_FILE: &str = "talent-scout.json";
pub const DEFAULT_UPSTREAM_URL: &str =
	"https://linkedin-sales-navigator-no-cookies-required.p.rapidapi.com";
pub const ROUTE_PREFIX: &str = "/api/linkedin-filters";

#[derive(Debug, Clone)]
pub struct Config {
	pub bind: SocketAddr,
	pub proxy_url: String,
	pub upstream_url: String,
	pub upstream_timeout: Duration,
	pub debounce: Duration,
	pub id_fallback: IdFallback,
	pub client_timeout: Duration,
	pub fallback_catalog: CatalogSource,
	pub config_file: Option<PathBuf>,
}

/// Where sample suggestions come from when a live lookup fails.
///
/// In a config file `"builtin"` and `"none"` are keywords; any other value is
/// a path to a JSON catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
	#[default]
	Builtin,
	Empty,
	File(PathBuf),
}

impl CatalogSource {
	fn from_setting(value: PathBuf, base_dir: Option<&Path>) -> Self {
		match value.to_str() {
			Some("builtin") => CatalogSource::Builtin,
			Some("none") => CatalogSource::Empty,
			_ => CatalogSource::File(match base_dir {
				// Relative catalog paths are resolved against the config file.
				Some(dir) if value.is_relative() => dir.join(value),
				_ => value,
			}),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
			proxy_url: format!("http://127.0.0.1:3000{ROUTE_PREFIX}"),
			upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
			upstream_timeout: Duration::from_secs(10),
			debounce: Duration::from_millis(300),
			id_fallback: IdFallback::NameHash,
			client_timeout: SuggestionClient::DEFAULT_TIMEOUT,
			fallback_catalog: CatalogSource::Builtin,
			config_file: None,
		}
	}
}

/// Optional keys of a JSON config file or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
	pub bind: Option<SocketAddr>,
	pub proxy_url: Option<String>,
	pub upstream_url: Option<String>,
	pub upstream_timeout_ms: Option<u64>,
	pub debounce_ms: Option<u64>,
	pub client_timeout_ms: Option<u64>,
	pub id_fallback: Option<IdFallback>,
	pub fallback_catalog: Option<PathBuf>,
}

impl Config {
	/// Defaults, then the config file, then `TALENT_SCOUT_*` variables.
	///
	/// An explicit path must exist; otherwise `talent-scout.json` in the
	/// working directory is used when present.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		Self::load_with(explicit, Path::new("."), |key| std::env::var(key).ok())
	}

	pub fn load_with(
		explicit: Option<&Path>,
		work_dir: &Path,
		env: impl Fn(&str) -> Option<String>,
	) -> Result<Self> {
		let mut config = Config::default();

		let file = match explicit {
			Some(path) => {
				anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
				Some(path.to_path_buf())
			}
			None => Some(work_dir.join(LOCAL_CONFIG_FILE)).filter(|path| path.exists()),
		};
		if let Some(path) = file {
			let overrides = load_file_overrides(&path)?;
			apply_overrides(&mut config, overrides, path.parent());
			config.config_file = Some(path);
		}

		let env_overrides = load_env_overrides(env)?;
		apply_overrides(&mut config, env_overrides, None);

		config.proxy_url = config.proxy_url.trim_end_matches('/').to_string();
		config.upstream_url = config.upstream_url.trim_end_matches('/').to_string();
		Ok(config)
	}

	pub fn fallback(&self) -> Result<FallbackCatalog> {
		match &self.fallback_catalog {
			CatalogSource::Builtin => Ok(FallbackCatalog::builtin()),
			CatalogSource::Empty => Ok(FallbackCatalog::empty()),
			CatalogSource::File(path) => FallbackCatalog::from_file(path),
		}
	}
}

fn load_file_overrides(path: &Path) -> Result<Overrides> {
	let contents =
		fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
	serde_json::from_str(&contents)
		.with_context(|| format!("failed to parse {} as talent-scout config", path.display()))
}

fn load_env_overrides(env: impl Fn(&str) -> Option<String>) -> Result<Overrides> {
	let var = |key: &str| env(key).map(|value| value.trim().to_string()).filter(|v| !v.is_empty());

	let bind = var("TALENT_SCOUT_BIND")
		.map(|value| {
			value
				.parse::<SocketAddr>()
				.with_context(|| format!("invalid TALENT_SCOUT_BIND value {value:?}"))
		})
		.transpose()?;
	let debounce_ms = var("TALENT_SCOUT_DEBOUNCE_MS")
		.map(|value| {
			value
				.parse::<u64>()
				.with_context(|| format!("invalid TALENT_SCOUT_DEBOUNCE_MS value {value:?}"))
		})
		.transpose()?;

	Ok(Overrides {
		bind,
		proxy_url: var("TALENT_SCOUT_PROXY_URL"),
		upstream_url: var("TALENT_SCOUT_UPSTREAM_URL"),
		debounce_ms,
		..Overrides::default()
	})
}

fn apply_overrides(config: &mut Config, overrides: Overrides, base_dir: Option<&Path>) {
	if let Some(bind) = overrides.bind {
		config.bind = bind;
	}
	if let Some(url) = overrides.proxy_url {
		config.proxy_url = url;
	}
	if let Some(url) = overrides.upstream_url {
		config.upstream_url = url;
	}
	if let Some(ms) = overrides.upstream_timeout_ms {
		config.upstream_timeout = Duration::from_millis(ms);
	}
	if let Some(ms) = overrides.debounce_ms {
		config.debounce = Duration::from_millis(ms);
	}
	if let Some(id_fallback) = overrides.id_fallback {
		config.id_fallback = id_fallback;
	}
	if let Some(ms) = overrides.client_timeout_ms {
		config.client_timeout = Duration::from_millis(ms);
	}
	if let Some(value) = overrides.fallback_catalog {
		config.fallback_catalog = CatalogSource::from_setting(value, base_dir);
	}
}

/// Provider secrets. Read once when the proxy starts.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	pub api_key: String,
	pub api_host: String,
}

impl Credentials {
	pub const KEY_VAR: &'static str = "RAPIDAPI_KEY";
	pub const HOST_VAR: &'static str = "RAPIDAPI_HOST";

	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let require = |key: &str| {
			env(key)
				.map(|value| value.trim().to_string())
				.filter(|value| !value.is_empty())
				.ok_or_else(|| {
					anyhow::anyhow!("{key} is not set; export it before starting the proxy")
				})
		};
		Ok(Self {
			api_key: require(Self::KEY_VAR)?,
			api_host: require(Self::HOST_VAR)?,
		})
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("api_key", &"<redacted>")
			.field("api_host", &self.api_host)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[test]
	fn defaults_without_file_or_env() {
		let dir = tempfile::tempdir().unwrap();
		let config = Config::load_with(None, dir.path(), env_of(&[])).unwrap();
		assert_eq!(config.bind.port(), 3000);
		assert_eq!(config.debounce, Duration::from_millis(300));
		assert_eq!(config.proxy_url, "http://127.0.0.1:3000/api/linkedin-filters");
		assert!(config.config_file.is_none());
	}

	#[test]
	fn local_file_then_env_overrides() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join(LOCAL_CONFIG_FILE),
			r#"{"debounce_ms": 150, "upstream_url": "http://stub.local/", "id_fallback": "random", "fallback_catalog": "samples.json"}"#,
		)
		.unwrap();

		let config = Config::load_with(
			None,
			dir.path(),
			env_of(&[("TALENT_SCOUT_DEBOUNCE_MS", "500"), ("TALENT_SCOUT_BIND", "0.0.0.0:8080")]),
		)
		.unwrap();

		assert_eq!(config.debounce, Duration::from_millis(500));
		assert_eq!(config.bind.port(), 8080);
		assert_eq!(config.upstream_url, "http://stub.local");
		assert_eq!(config.id_fallback, IdFallback::Random);
		assert_eq!(
			config.fallback_catalog,
			CatalogSource::File(dir.path().join("samples.json"))
		);
	}

	#[test]
	fn client_timeout_comes_from_the_file() {
		let dir = tempfile::tempdir().unwrap();
		assert_eq!(
			Config::load_with(None, dir.path(), env_of(&[])).unwrap().client_timeout,
			Duration::from_secs(15)
		);

		fs::write(dir.path().join(LOCAL_CONFIG_FILE), r#"{"client_timeout_ms": 2500}"#).unwrap();
		let config = Config::load_with(None, dir.path(), env_of(&[])).unwrap();
		assert_eq!(config.client_timeout, Duration::from_millis(2500));
	}

	#[test]
	fn catalog_keywords_select_builtin_or_empty() {
		let dir = tempfile::tempdir().unwrap();
		let config = Config::load_with(None, dir.path(), env_of(&[])).unwrap();
		assert_eq!(config.fallback_catalog, CatalogSource::Builtin);
		assert_eq!(config.fallback().unwrap().len(), 20);

		fs::write(dir.path().join(LOCAL_CONFIG_FILE), r#"{"fallback_catalog": "none"}"#).unwrap();
		let config = Config::load_with(None, dir.path(), env_of(&[])).unwrap();
		assert_eq!(config.fallback_catalog, CatalogSource::Empty);
		assert!(config.fallback().unwrap().is_empty());

		fs::write(dir.path().join(LOCAL_CONFIG_FILE), r#"{"fallback_catalog": "builtin"}"#).unwrap();
		let config = Config::load_with(None, dir.path(), env_of(&[])).unwrap();
		assert_eq!(config.fallback_catalog, CatalogSource::Builtin);
	}

	#[test]
	fn explicit_path_must_exist() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("nope.json");
		let err = Config::load_with(Some(&missing), dir.path(), env_of(&[])).unwrap_err();
		assert!(err.to_string().contains("does not exist"));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("custom.json");
		fs::write(&path, r#"{"debounce": 10}"#).unwrap();
		let err = Config::load_with(Some(&path), dir.path(), env_of(&[])).unwrap_err();
		assert!(err.to_string().contains("custom.json"));
	}

	#[test]
	fn bad_env_value_is_named() {
		let dir = tempfile::tempdir().unwrap();
		let err = Config::load_with(None, dir.path(), env_of(&[("TALENT_SCOUT_DEBOUNCE_MS", "soon")]))
			.unwrap_err();
		assert!(err.to_string().contains("TALENT_SCOUT_DEBOUNCE_MS"));
	}

	#[test]
	fn credentials_require_both_secrets() {
		let err = Credentials::from_lookup(env_of(&[("RAPIDAPI_KEY", "k")])).unwrap_err();
		assert!(err.to_string().contains("RAPIDAPI_HOST"));

		let err = Credentials::from_lookup(env_of(&[("RAPIDAPI_KEY", " "), ("RAPIDAPI_HOST", "h")]))
			.unwrap_err();
		assert!(err.to_string().contains("RAPIDAPI_KEY"));

		let creds =
			Credentials::from_lookup(env_of(&[("RAPIDAPI_KEY", "secret"), ("RAPIDAPI_HOST", "h")]))
				.unwrap();
		assert_eq!(creds.api_host, "h");
		assert!(!format!("{creds:?}").contains("secret"));
	}
}
