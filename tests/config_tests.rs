//! Tests for the type-safe configuration builder pattern

use gatecrawl::CrawlConfig;

#[test]
fn test_builder_requires_output_root_and_start_url() {
    // These should not compile if uncommented - the typestate builder
    // only exposes build() once both required fields are set.
    // let config = CrawlConfig::builder().build();
    // let config = CrawlConfig::builder().output_root("/tmp").build();

    let config = CrawlConfig::builder()
        .output_root("/tmp/gatecrawl-test")
        .start_url("https://example.com")
        .build()
        .expect("both required fields provided");

    assert_eq!(config.output_root().to_str(), Some("/tmp/gatecrawl-test"));
    assert_eq!(config.start_url(), "https://example.com");
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = CrawlConfig::builder()
        .output_root("/tmp/gatecrawl-test")
        .start_url("https://example.com")
        .build()
        .expect("valid config");

    assert_eq!(config.page_workers(), 5);
    assert_eq!(config.pdf_workers(), 3);
    assert!(config.headless());
    assert!(config.password().is_none());
    assert!(config.blacklist().is_empty());
    assert_eq!(config.auth_container_selector(), "#SITE_CONTAINER");
    assert_eq!(config.navigation_timeout().as_secs(), 45);
    assert_eq!(config.auth_detach_timeout().as_secs(), 10);
    assert_eq!(config.auth_container_timeout().as_secs(), 10);
    assert_eq!(config.auth_settle_timeout().as_secs(), 30);
}

#[test]
fn test_builder_with_all_optional_fields() {
    let blacklist = vec![
        "https://example.com/logout".to_string(),
        "https://example.com/admin/".to_string(),
    ];

    let config = CrawlConfig::builder()
        .output_root("/tmp/out")
        .start_url("https://example.com/home")
        .password("hunter2")
        .blacklist(blacklist.clone())
        .page_workers(8)
        .pdf_workers(2)
        .headless(false)
        .auth_container_selector("#main")
        .navigation_timeout_secs(10)
        .build()
        .expect("valid config");

    assert_eq!(config.password(), Some("hunter2"));
    assert_eq!(config.blacklist(), blacklist.as_slice());
    assert_eq!(config.page_workers(), 8);
    assert_eq!(config.pdf_workers(), 2);
    assert!(!config.headless());
    assert_eq!(config.auth_container_selector(), "#main");
    assert_eq!(config.navigation_timeout().as_secs(), 10);
}

#[test]
fn test_builder_normalizes_scheme_less_start_url() {
    let config = CrawlConfig::builder()
        .output_root("/tmp/out")
        .start_url("example.com/start")
        .build()
        .expect("valid config");

    assert_eq!(config.start_url(), "https://example.com/start");
}

#[test]
fn test_builder_rejects_hostless_start_url() {
    assert!(
        CrawlConfig::builder()
            .output_root("/tmp/out")
            .start_url("data:text/plain,hi")
            .build()
            .is_err()
    );
}

#[test]
fn test_builder_rejects_zero_workers() {
    assert!(
        CrawlConfig::builder()
            .output_root("/tmp/out")
            .start_url("https://example.com")
            .page_workers(0)
            .build()
            .is_err()
    );
}
