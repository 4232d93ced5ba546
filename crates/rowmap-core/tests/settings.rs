use rowmap_core::{AutoMappingBehavior, Settings};

use pretty_assertions::assert_eq;

#[test]
fn defaults() {
    let settings = Settings::default();

    assert_eq!(settings.auto_mapping_behavior, AutoMappingBehavior::Partial);
    assert!(!settings.lazy_loading_enabled);
    assert!(settings.cache_enabled);
    assert_eq!(settings.database_id, None);
}

#[test]
fn deserializes_camel_case_keys() {
    let settings: Settings = serde_json::from_str(
        r#"{
            "autoMappingBehavior": "NONE",
            "lazyLoadingEnabled": true,
            "cacheEnabled": false,
            "databaseId": "postgres"
        }"#,
    )
    .unwrap();

    assert_eq!(
        settings,
        Settings::default()
            .auto_mapping_behavior(AutoMappingBehavior::None)
            .lazy_loading_enabled(true)
            .cache_enabled(false)
            .database_id("postgres")
    );
}

#[test]
fn missing_keys_keep_defaults() {
    let settings: Settings = serde_json::from_str(r#"{ "databaseId": "mysql" }"#).unwrap();

    assert_eq!(settings.auto_mapping_behavior, AutoMappingBehavior::Partial);
    assert!(settings.cache_enabled);
    assert_eq!(settings.database_id.as_deref(), Some("mysql"));
}

#[test]
fn rejects_unknown_behavior() {
    assert!(serde_json::from_str::<Settings>(r#"{ "autoMappingBehavior": "SOME" }"#).is_err());
}

#[test]
fn auto_mapping_behavior_and_nesting() {
    assert!(!AutoMappingBehavior::None.applies_to(false));
    assert!(AutoMappingBehavior::Partial.applies_to(false));
    assert!(!AutoMappingBehavior::Partial.applies_to(true));
    assert!(AutoMappingBehavior::Full.applies_to(true));
}
