//! Shared configuration constants for gatecrawl
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default number of concurrent page workers
///
/// Each worker drives one rendered page at a time through the shared
/// browser. Five pages keeps a single Chromium instance responsive;
/// users can adjust via `page_workers`.
pub const DEFAULT_PAGE_WORKERS: usize = 5;

/// Default number of PDF pipeline workers
///
/// PDF jobs are plain HTTP fetches plus text extraction, cheaper than a
/// rendered page, so the pool is smaller than the page pool.
pub const DEFAULT_PDF_WORKERS: usize = 3;

/// Capacity of the PDF job queue
///
/// Bounds memory when a single page triggers a burst of intercepted
/// responses. Producers await on a full queue.
pub const PDF_QUEUE_CAPACITY: usize = 128;

/// Default navigation timeout: 45 seconds
///
/// Covers `page.goto()` plus the load event. Exceeding it is terminal for
/// the page (no artifact, failure counted).
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 45;

/// Default wait for the password field to detach after submit: 10 seconds
pub const DEFAULT_AUTH_DETACH_TIMEOUT_SECS: u64 = 10;

/// Default wait for the post-login content container: 10 seconds
pub const DEFAULT_AUTH_CONTAINER_TIMEOUT_SECS: u64 = 10;

/// Default wait for the network to settle after authentication: 30 seconds
pub const DEFAULT_AUTH_SETTLE_TIMEOUT_SECS: u64 = 30;

/// Fixed backoff after an access-denied classification: 5 seconds
///
/// The denied URL is already back in the frontier; the sleep only keeps the
/// worker from hammering the same auth wall in a tight loop.
pub const ACCESS_DENIED_BACKOFF_SECS: u64 = 5;

/// Settle delay after each tab click: 500 milliseconds
///
/// Gives a click-triggered response time to reach the PDF interceptor
/// before the next tab is activated.
pub const TAB_SETTLE_MILLIS: u64 = 500;

/// Poll interval for idle page workers waiting on the frontier
pub const FRONTIER_IDLE_POLL_MILLIS: u64 = 200;

/// CSS selector for the password input of an auth wall
pub const PASSWORD_FIELD_SELECTOR: &str = "input[type=\"password\"]";

/// Default CSS selector for the container that becomes visible after login
pub const DEFAULT_AUTH_CONTAINER_SELECTOR: &str = "#SITE_CONTAINER";

/// First-line sentinels that classify a rendered page as access-denied
///
/// Matched exactly against the first non-blank line of the extracted text.
pub const DENIAL_SENTINELS: [&str; 2] = ["ERROR: FORBIDDEN", "Password Protected"];

/// Maximum length of a sanitized URL filename (before the `.txt` suffix)
pub const MAX_FILENAME_LEN: usize = 180;

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
/// Next update: 2025-04-29 (quarterly schedule)
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
