//! Last-route persistence: a small TOML state file, or memory only.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    application::ports::{LAST_ROUTE_KEY, RouteStore, StoreError},
    util::lock::mutex_lock,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(rename = "admin:lastRoute", default, skip_serializing_if = "Option::is_none")]
    last_route: Option<String>,
}

/// Stores the last route under `admin:lastRoute` in a TOML file.
#[derive(Debug, Clone)]
pub struct TomlRouteStore {
    path: PathBuf,
}

impl TomlRouteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StateFile, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(StateFile::default()),
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&data).map_err(|err| StoreError::Corrupt(err.to_string()))
    }
}

impl RouteStore for TomlRouteStore {
    fn last_route(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .read()?
            .last_route
            .filter(|route| !route.trim().is_empty()))
    }

    fn save_route(&self, route: &str) -> Result<(), StoreError> {
        let mut state = self.read().unwrap_or_default();
        state.last_route = Some(route.to_string());
        let encoded = toml::to_string_pretty(&state)
            .map_err(|err| StoreError::Corrupt(format!("failed to encode state: {err}")))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encoded)?;
        debug!(key = LAST_ROUTE_KEY, route, path = %self.path.display(), "route saved");
        Ok(())
    }
}

/// Keeps the last route for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryRouteStore {
    route: Mutex<Option<String>>,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(route: impl Into<String>) -> Self {
        Self {
            route: Mutex::new(Some(route.into())),
        }
    }
}

impl RouteStore for MemoryRouteStore {
    fn last_route(&self) -> Result<Option<String>, StoreError> {
        Ok(mutex_lock(&self.route, "infra::store", "last_route").clone())
    }

    fn save_route(&self, route: &str) -> Result<(), StoreError> {
        *mutex_lock(&self.route, "infra::store", "save_route") = Some(route.to_string());
        Ok(())
    }
}
