use quill_config::{QuillConfig, SearchConfig, StorageConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &QuillConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &QuillConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.llm.is_configured() && has_env_prefix(&env_keys, "QUILL_LLM") {
        warnings.push(
            "LLM config appears unconfigured while QUILL_LLM* env vars exist. Use double underscores (example: QUILL_LLM__API_KEY)."
                .to_string(),
        );
    }

    let search_default = SearchConfig::default();
    if config.search.base_url == search_default.base_url
        && config.search.timeout_secs == search_default.timeout_secs
        && config.search.user_agent == search_default.user_agent
        && has_env_prefix(&env_keys, "QUILL_SEARCH")
    {
        warnings.push(
            "Search config appears default while QUILL_SEARCH* env vars exist. Use double underscores (example: QUILL_SEARCH__TIMEOUT_SECS)."
                .to_string(),
        );
    }

    if config.storage.db_path == StorageConfig::default().db_path
        && has_env_prefix(&env_keys, "QUILL_STORAGE")
    {
        warnings.push(
            "Storage config appears default while QUILL_STORAGE* env vars exist. Use double underscores (example: QUILL_STORAGE__DB_PATH)."
                .to_string(),
        );
    }

    if !config.llm.is_configured() && !has_env_prefix(&env_keys, "QUILL_LLM") {
        warnings.push(
            "No language model is configured (QUILL_LLM__API_KEY); replies will use built-in fallbacks."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
