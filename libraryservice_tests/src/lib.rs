//! End to end tests run against a running libraryservice, e.g. `LIBRARYSERVICE_URL=http://127.0.0.1:8080`

#[cfg(any(feature = "system_tests", feature = "load_tests"))]
pub(crate) fn libraryservice_url() -> String {
    std::env::var("LIBRARYSERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}
