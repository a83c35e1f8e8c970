//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use quill_config::QuillConfig;

#[test]
fn loads_llm_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[llm]
base_url = "http://localhost:11434/v1"
api_key = "local-key"
model = "llama3.1"
timeout_secs = 120
temperature = 0.1
"#,
        )?;

        let config: QuillConfig = Figment::from(Serialized::defaults(QuillConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.api_key, "local-key");
        assert_eq!(config.llm.model, "llama3.1");
        assert_eq!(config.llm.timeout_secs, 120);
        assert!((config.llm.temperature - 0.1).abs() < f32::EPSILON);
        assert!(config.llm.is_configured());
        Ok(())
    });
}

#[test]
fn loads_workflow_and_storage_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
db_path = "/tmp/research.db"

[workflow]
max_keywords = 6
max_analyses = 3
"#,
        )?;

        let config: QuillConfig = Figment::from(Serialized::defaults(QuillConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.db_path, "/tmp/research.db");
        assert_eq!(config.workflow.max_keywords, 6);
        assert_eq!(config.workflow.max_analyses, 3);
        // Untouched keys keep their defaults
        assert_eq!(config.workflow.results_per_keyword, 5);
        assert_eq!(config.workflow.history_window, 10);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_sections_default() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[search]
timeout_secs = 5
"#,
        )?;

        let config: QuillConfig = Figment::from(Serialized::defaults(QuillConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.search.timeout_secs, 5);
        assert_eq!(config.search.base_url, "https://export.arxiv.org/api/query");
        assert!(!config.llm.is_configured());
        assert_eq!(config.storage.db_path, ".quill/quill.db");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[llm]
model = "from-toml"
api_key = "toml-key"
"#,
        )?;
        jail.set_env("QUILL_LLM__MODEL", "from-env");

        let config: QuillConfig = Figment::from(Serialized::defaults(QuillConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("QUILL_").split("__"))
            .extract()?;

        assert_eq!(config.llm.model, "from-env");
        assert_eq!(config.llm.api_key, "toml-key");
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".quill")?;
        jail.create_file(
            ".quill/config.toml",
            r#"
[storage]
db_path = "project.db"
"#,
        )?;

        let config = QuillConfig::load().expect("config loads");
        assert_eq!(config.storage.db_path, "project.db");
        Ok(())
    });
}
