use std::sync::Arc;

use bookmarks_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, pool }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Path segment the bookmarks router is nested under, e.g. `/api`
    pub api_prefix: String,
}

impl AppConfig {
    /// Full path of the bookmarks collection.
    pub fn bookmarks_path(&self) -> String {
        let prefix = self.api_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            "/bookmarks".to_string()
        } else if prefix.starts_with('/') {
            format!("{prefix}/bookmarks")
        } else {
            format!("/{prefix}/bookmarks")
        }
    }
}
