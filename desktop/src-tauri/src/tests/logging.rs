use crate::logging::{current_log_path, default_filter, logs_dir};

use googletest::assert_that;
use googletest::prelude::{contains_substring, ends_with, starts_with};

#[test]
fn test_default_filter_uses_configured_level() {
    let filter = default_filter("DEBUG");

    assert_that!(filter, starts_with("debug,"));
    assert_that!(filter, contains_substring("tao=warn"));
}

#[test]
fn test_default_filter_parses() {
    let filter = tracing_subscriber::EnvFilter::try_new(default_filter("info"));
    assert!(filter.is_ok());
}

#[test]
fn test_current_log_path_is_dated_file_in_logs_dir() {
    let temp = tempfile::tempdir().unwrap();

    let path = current_log_path(temp.path());

    assert_eq!(path.parent(), Some(logs_dir(temp.path()).as_path()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_that!(name, starts_with("bonsai-dca."));
    assert_that!(name, ends_with(".log"));
}
