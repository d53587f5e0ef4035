//! Integration tests for the referer filter
//!
//! These tests load rule and config files from disk and run whole event
//! batches through the filter end-to-end.

use referal::config::load_config;
use referal::{
    classify, ClassificationResult, ClassifierConfig, DatabaseLoadError, Medium, ReferalError,
    RefererFilter, RuleDatabase,
};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

const BASE_RULES: &str = r#"
[[referer]]
domain = "google.com"
medium = "search"
name = "Google"
parameter = "q"

[[referer.paths]]
prefix = "/search"
parameter = "q"

[[referer.paths]]
prefix = "/imgres"
parameter = "imgurl"

[[referer]]
domain = "example.com"
medium = "social"
name = "Example Social"

[[referer]]
domain = "facebook.com"
medium = "social"
name = "Facebook"
"#;

const CUSTOM_RULES: &str = r#"
[[referer]]
domain = "example.com"
medium = "internal"
name = "Example Intranet"

[[referer]]
domain = "staging.test"
medium = "internal"
name = "Staging"
"#;

/// Writes content to a temporary file that lives as long as the handle
fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

fn event(fields: Value) -> Map<String, Value> {
    match fields {
        Value::Object(map) => map,
        _ => panic!("test events must be objects"),
    }
}

#[test]
fn test_concrete_scenarios_with_bundled_rules() {
    let db = RuleDatabase::bundled().expect("Bundled rules must load");

    assert_eq!(
        classify("https://www.google.com/search?q=logstash+referer", None, &db),
        ClassificationResult {
            known: true,
            name: Some("Google".to_string()),
            medium: Some(Medium::Search),
            search_term: Some("logstash referer".to_string()),
            host: Some("www.google.com".to_string()),
        }
    );

    assert_eq!(
        classify("https://news.ycombinator.com/", None, &db),
        ClassificationResult::unknown(Some("news.ycombinator.com".to_string()))
    );

    assert_eq!(
        classify(
            "https://app.example.com/page2",
            Some("https://app.example.com/page1"),
            &db
        ),
        ClassificationResult::internal("app.example.com".to_string())
    );

    assert_eq!(classify("", None, &db), ClassificationResult::unknown(None));

    assert_eq!(
        classify("https://m.facebook.com/", None, &db),
        ClassificationResult {
            known: true,
            name: Some("Facebook".to_string()),
            medium: Some(Medium::Social),
            search_term: None,
            host: Some("m.facebook.com".to_string()),
        }
    );
}

#[test]
fn test_bundled_search_engines() {
    let db = RuleDatabase::bundled().expect("Bundled rules must load");

    let cases = [
        ("https://www.google.co.uk/search?q=tea+time", "Google", "tea time"),
        ("https://www.bing.com/search?q=ferris", "Bing", "ferris"),
        ("https://search.yahoo.com/search?p=rust+book", "Yahoo!", "rust book"),
        ("https://duckduckgo.com/?q=cargo", "DuckDuckGo", "cargo"),
        ("https://www.baidu.com/s?wd=rust", "Baidu", "rust"),
        ("https://yandex.ru/search/?text=borrow", "Yandex", "borrow"),
        ("https://www.ecosia.org/search?q=trees", "Ecosia", "trees"),
    ];

    for (referer, name, term) in cases {
        let result = classify(referer, None, &db);
        assert!(result.known, "{} should be known", referer);
        assert_eq!(result.medium, Some(Medium::Search), "{}", referer);
        assert_eq!(result.name.as_deref(), Some(name), "{}", referer);
        assert_eq!(result.search_term.as_deref(), Some(term), "{}", referer);
    }
}

#[test]
fn test_path_patterns_from_file() {
    let base = create_temp_file(BASE_RULES);
    let db = RuleDatabase::load(base.path(), None).expect("Failed to load rules");

    let result = classify(
        "https://www.google.com/imgres?imgurl=cat.png&q=cats",
        None,
        &db,
    );
    assert_eq!(result.search_term.as_deref(), Some("cat.png"));

    // No pattern matches, default parameter applies
    let result = classify("https://www.google.com/webhp?q=dogs", None, &db);
    assert_eq!(result.search_term.as_deref(), Some("dogs"));
}

#[test]
fn test_custom_file_overrides_whole_rule() {
    let base = create_temp_file(BASE_RULES);
    let custom = create_temp_file(CUSTOM_RULES);

    let base_only = RuleDatabase::load(base.path(), None).expect("Failed to load base");
    let custom_only = RuleDatabase::load(custom.path(), None).expect("Failed to load custom");
    let merged =
        RuleDatabase::load(base.path(), Some(custom.path())).expect("Failed to load merged");

    assert_eq!(
        merged.lookup("example.com"),
        custom_only.lookup("example.com")
    );
    assert_eq!(merged.lookup("google.com"), base_only.lookup("google.com"));
    assert!(merged.lookup("staging.test").is_some());
    assert_eq!(merged.len(), 4);
    assert_eq!(merged.sources().len(), 2);

    let result = classify("https://cdn.example.com/", None, &merged);
    assert_eq!(result.medium, Some(Medium::Internal));
    assert_eq!(result.name.as_deref(), Some("Example Intranet"));
}

#[test]
fn test_load_errors_name_file_and_entry() {
    let duplicate = create_temp_file(
        r#"
[[referer]]
domain = "google.com"
medium = "search"
name = "Google"

[[referer]]
domain = "google.com"
medium = "social"
name = "Google Again"
"#,
    );
    let err = RuleDatabase::load(duplicate.path(), None).unwrap_err();
    assert!(matches!(err, DatabaseLoadError::DuplicateDomain { .. }));
    let message = err.to_string();
    assert!(message.contains("google.com"));
    assert!(message.contains(&duplicate.path().display().to_string()));

    let unknown_medium = create_temp_file(
        r#"
[[referer]]
domain = "mail.com"
medium = "email"
name = "Mail"
"#,
    );
    let err = RuleDatabase::load(unknown_medium.path(), None).unwrap_err();
    assert!(matches!(err, DatabaseLoadError::UnknownMedium { .. }));
    assert!(err.to_string().contains("mail.com"));

    // A broken custom file fails the whole load
    let base = create_temp_file(BASE_RULES);
    let err = RuleDatabase::load(base.path(), Some(Path::new("/nonexistent/custom.toml")))
        .unwrap_err();
    assert!(matches!(err, DatabaseLoadError::Io { .. }));
}

#[test]
fn test_filter_from_config_file() {
    let base = create_temp_file(BASE_RULES);
    let custom = create_temp_file(CUSTOM_RULES);
    let config_file = create_temp_file(&format!(
        r#"
source = "referrer"
page-source = "url"
target = "referal"
prefix = "ref_"

[rules]
referers-file = "{}"
custom-referers-file = "{}"
"#,
        base.path().display(),
        custom.path().display()
    ));

    let config = load_config(config_file.path()).expect("Failed to load config");
    let filter = RefererFilter::from_config(config).expect("Failed to build filter");

    let mut event = event(json!({
        "referrer": "https://www.google.com/search?q=logstash+referer",
        "url": "https://shop.example.org/cart",
        "referal": {"campaign": "spring"}
    }));

    assert!(filter.filter(&mut event));
    assert_eq!(
        event["referal"],
        json!({
            "campaign": "spring",
            "ref_known": true,
            "ref_name": "Google",
            "ref_medium": "search",
            "ref_search_term": "logstash referer",
            "ref_host": "www.google.com"
        })
    );
    assert_eq!(event["url"], json!("https://shop.example.org/cart"));
}

#[test]
fn test_filter_from_config_missing_rules() {
    let config_file = create_temp_file(
        r#"
source = "referrer"

[rules]
referers-file = "/nonexistent/referers.toml"
"#,
    );

    let config = load_config(config_file.path()).expect("Failed to load config");
    let err = RefererFilter::from_config(config).unwrap_err();
    assert!(matches!(err, ReferalError::Rules(DatabaseLoadError::Io { .. })));
    assert!(err.to_string().contains("/nonexistent/referers.toml"));
}

#[test]
fn test_batch_continues_after_faults() {
    let base = create_temp_file(BASE_RULES);
    let db = Arc::new(RuleDatabase::load(base.path(), None).expect("Failed to load rules"));
    let filter = RefererFilter::new(ClassifierConfig::new("referrer"), db);

    let mut events: Vec<Map<String, Value>> = vec![
        event(json!({"referrer": {"nested": true}})),
        event(json!({"referrer": "://garbage"})),
        event(json!({"referrer": ""})),
        event(json!({"referrer": "https://m.facebook.com/"})),
        event(json!({"referrer": 17})),
        event(json!({"referrer": "https://news.ycombinator.com/item?id=1"})),
    ];

    let written: Vec<bool> = events.iter_mut().map(|e| filter.filter(e)).collect();
    assert_eq!(written, vec![false, false, false, true, false, true]);

    assert_eq!(events[3]["name"], json!("Facebook"));
    assert_eq!(events[5]["known"], json!(false));
    assert_eq!(events[5]["host"], json!("news.ycombinator.com"));
    assert!(events[0].get("known").is_none());
    assert!(events[4].get("known").is_none());
}

#[test]
fn test_legacy_nested_layout() {
    let db = Arc::new(RuleDatabase::bundled().expect("Bundled rules must load"));
    let mut config = ClassifierConfig::new("referrer");
    config.target = Some(referal::Placement::LEGACY_TARGET.to_string());
    let filter = RefererFilter::new(config, db);

    let mut event = event(json!({"referrer": "https://t.co/abc123"}));
    assert!(filter.filter(&mut event));
    assert_eq!(event["referal"]["medium"], json!("social"));
    assert_eq!(event["referal"]["name"], json!("Twitter"));
}

#[test]
fn test_shared_database_across_threads() {
    let db = Arc::new(RuleDatabase::bundled().expect("Bundled rules must load"));
    let filter = RefererFilter::new(ClassifierConfig::new("referrer"), Arc::clone(&db));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let filter = filter.clone();
            thread::spawn(move || {
                for n in 0..200 {
                    let referer = if (i + n) % 2 == 0 {
                        format!("https://www.google.com/search?q=term{}", n)
                    } else {
                        format!("https://m.facebook.com/story/{}", n)
                    };

                    let mut event = event(json!({ "referrer": referer }));
                    assert!(filter.filter(&mut event));

                    if (i + n) % 2 == 0 {
                        assert_eq!(event["search_term"], json!(format!("term{}", n)));
                    } else {
                        assert_eq!(event["medium"], json!("social"));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Worker thread panicked");
    }

    // Workers only ever read the database
    assert_eq!(Arc::strong_count(&db), 2);
}
