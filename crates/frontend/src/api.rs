use tract_shared::models::{CategoryConfig, ConfigError, IndicatorConfig};

/// Path prefix the app is served under, fixed at build time.
const BASE_PATH: &str = match option_env!("DASHBOARD_BASE_PATH") {
    Some(path) => path,
    None => "",
};

pub const CATEGORY_CONFIG: &str = "config/main.json";

/// Join origin, base path and a relative resource without doubling slashes.
/// Absolute `http(s)` resources are returned unchanged.
pub fn join_url(origin: &str, base_path: &str, resource: &str) -> String {
    if resource.starts_with("http://") || resource.starts_with("https://") {
        return resource.to_string();
    }
    let mut url = origin.trim_end_matches('/').to_string();
    for part in [base_path, resource] {
        let part = part.trim_matches('/');
        if !part.is_empty() {
            url.push('/');
            url.push_str(part);
        }
    }
    url
}

/// The page query string without its leading `?`.
pub fn query_str_from_search(search: &str) -> String {
    search.strip_prefix('?').unwrap_or(search).to_string()
}

fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

pub fn resource_url(resource: &str) -> String {
    join_url(&origin(), BASE_PATH, resource)
}

/// App-relative link, honouring the build-time base path.
pub fn app_href(path: &str) -> String {
    join_url("", BASE_PATH, path)
}

pub fn current_query_str() -> String {
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    query_str_from_search(&search)
}

async fn get_text(url: &str) -> Result<String, String> {
    let resp = reqwest::get(url).await.map_err(|e| e.to_string())?;
    let resp = resp.error_for_status().map_err(|e| e.to_string())?;
    resp.text().await.map_err(|e| e.to_string())
}

/// Fetch a resource relative to the app base as text.
pub async fn fetch_text(resource: &str) -> Result<String, ConfigError> {
    let url = resource_url(resource);
    tracing::debug!(%url, "fetching");
    get_text(&url).await.map_err(|reason| ConfigError::Fetch { url, reason })
}

pub async fn fetch_category_config() -> Result<CategoryConfig, ConfigError> {
    let body = fetch_text(CATEGORY_CONFIG).await?;
    CategoryConfig::from_json(&body)
}

pub async fn fetch_indicator_config(resource: &str) -> Result<IndicatorConfig, ConfigError> {
    let body = fetch_text(resource).await?;
    IndicatorConfig::from_json(&body)
}
