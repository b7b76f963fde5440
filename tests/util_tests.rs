use std::path::Path;

use mcupload::{api_endpoint, api_url, display_body, normalize_base_url, upload_file_name};

#[test]
fn relative_release_url_joins_onto_api_host() {
    let base = normalize_base_url("https://api.mobile.azure.com").unwrap();
    assert_eq!(base.as_str(), "https://api.mobile.azure.com/");

    let url = api_url(&base, "v0.1/apps/o/a/releases/3").unwrap();
    assert_eq!(url.as_str(), "https://api.mobile.azure.com/v0.1/apps/o/a/releases/3");

    let leading = api_url(&base, "/v0.1/apps/o/a/releases/3").unwrap();
    assert_eq!(leading, url);
}

#[test]
fn base_url_with_path_keeps_prefix() {
    let base = normalize_base_url("http://127.0.0.1:8080/proxy").unwrap();
    let url = api_url(&base, "v0.1/apps/o/a/release_uploads").unwrap();
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:8080/proxy/v0.1/apps/o/a/release_uploads"
    );
}

#[test]
fn absolute_urls_pass_through() {
    let base = normalize_base_url("https://api.mobile.azure.com/").unwrap();
    let url = api_url(&base, "https://upload.example.net/slot?token=x").unwrap();
    assert_eq!(url.as_str(), "https://upload.example.net/slot?token=x");
}

#[test]
fn upload_name_is_last_path_component() {
    assert_eq!(upload_file_name(Path::new("out/ios/build.ipa")), "build.ipa");
    assert_eq!(upload_file_name(Path::new("App.apk")), "App.apk");
}

#[test]
fn body_display_trims_and_truncates() {
    assert_eq!(display_body("  \n"), "<empty body>");
    assert_eq!(display_body(" {\"a\":1}\n"), "{\"a\":1}");
    let long = "x".repeat(5000);
    let shown = display_body(&long);
    assert!(shown.ends_with("..."));
    assert_eq!(shown.len(), 2048 + 3);
}

#[test]
fn endpoint_segments_are_encoded_one_per_name() {
    let base = normalize_base_url("https://api.mobile.azure.com").unwrap();
    let url = api_endpoint(&base, &["v0.1", "apps", "Owner", "App#2", "release_uploads"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.mobile.azure.com/v0.1/apps/Owner/App%232/release_uploads"
    );
    assert_eq!(url.fragment(), None);

    let url = api_endpoint(&base, &["v0.1", "apps", "Owner", "../x", "release_uploads"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.mobile.azure.com/v0.1/apps/Owner/..%2Fx/release_uploads"
    );
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let base = normalize_base_url("http://127.0.0.1:8080/proxy").unwrap();
    let url = api_endpoint(&base, &["v0.1", "apps", "o", "a", "release_uploads", "up 1"]).unwrap();
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:8080/proxy/v0.1/apps/o/a/release_uploads/up%201"
    );
}
