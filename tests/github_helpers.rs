use repo_digest::github::{decode_readme_content, next_link};

#[test]
fn next_link_is_found_among_other_relations() {
    let header = concat!(
        "<https://api.github.com/user/repos?per_page=100&page=1>; rel=\"prev\", ",
        "<https://api.github.com/user/repos?per_page=100&page=3>; rel=\"next\", ",
        "<https://api.github.com/user/repos?per_page=100&page=5>; rel=\"last\""
    );
    assert_eq!(
        next_link(header).as_deref(),
        Some("https://api.github.com/user/repos?per_page=100&page=3")
    );
}

#[test]
fn last_page_has_no_next_link() {
    let header = "<https://api.github.com/user/repos?page=1>; rel=\"first\", <https://api.github.com/user/repos?page=4>; rel=\"prev\"";
    assert_eq!(next_link(header), None);
    assert_eq!(next_link(""), None);
}

#[test]
fn readme_content_ignores_line_wrapping() {
    assert_eq!(
        decode_readme_content("SGVsbG8s\nIFdvcmxkIQ==\n").as_deref(),
        Some("Hello, World!")
    );
}

#[test]
fn readme_with_invalid_utf8_is_decoded_lossily() {
    // 0x68 0x69 0xFF
    assert_eq!(decode_readme_content("aGn/").as_deref(), Some("hi\u{FFFD}"));
}

#[test]
fn non_base64_readme_is_treated_as_absent() {
    assert_eq!(decode_readme_content("!!not base64!!"), None);
}
