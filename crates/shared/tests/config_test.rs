//! 配置加载的集成测试
//!
//! 验证显式配置文件与默认值的合并行为

use std::fs;

use storefront_shared::config::AppConfig;
use tempfile::TempDir;

#[test]
fn test_load_with_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("load.toml");
    fs::write(
        &path,
        r#"
        [target]
        host = "http://127.0.0.1:18095"
        request_timeout_seconds = 5

        [session]
        profile = "gateway"
        think_time_min_ms = 100
        think_time_max_ms = 200

        [session.weights]
        login = 0
        list_products = 7

        [run]
        users = 3
        duration_seconds = 15
        "#,
    )
    .unwrap();

    let config = AppConfig::load("storefront-load", Some(&path)).unwrap();

    assert_eq!(config.service_name, "storefront-load");
    assert_eq!(config.target.host, "http://127.0.0.1:18095");
    assert_eq!(config.target.request_timeout_seconds, 5);
    assert_eq!(config.session.profile, "gateway");
    assert_eq!(config.session.think_time_min_ms, Some(100));
    assert_eq!(config.session.think_time_max_ms, Some(200));
    assert_eq!(config.session.weights.get("login"), Some(&0));
    assert_eq!(config.session.weights.get("list_products"), Some(&7));
    assert_eq!(config.run.users, 3);
    assert_eq!(config.run.duration_seconds, 15);
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    assert!(AppConfig::load("storefront-load", Some(&path)).is_err());
}

#[test]
fn test_load_without_files_uses_defaults() {
    let config = AppConfig::load("mock-storefront", None).unwrap();

    assert_eq!(config.service_name, "mock-storefront");
    assert_eq!(config.session.profile, "storefront");
    assert_eq!(config.run.users, 10);
    assert_eq!(config.observability.log_level, "info");
}
