/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Make a model-supplied value safe to embed in a single file name.
///
/// Path separators and control characters become `_`, and a run of dots
/// collapses to one so no `..` segment survives.
pub fn sanitize_file_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        let c = if c == '/' || c == '\\' || c.is_control() { '_' } else { c };
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Short random identifier. Collisions are tolerated by callers.
pub fn short_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(9);
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title(""), "");
        assert_eq!(sanitize_title("Hello World"), "Hello_World");
        assert_eq!(sanitize_title("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_title("Video #42!"), "Video__42_");
        assert_eq!(sanitize_title("caf\u{e9} ok"), "caf__ok");
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("1080p"), "1080p");
        assert_eq!(sanitize_file_component("1080p/60fps"), "1080p_60fps");
        assert_eq!(sanitize_file_component("a\\b"), "a_b");
        assert_eq!(sanitize_file_component("x/../../escaped"), "x_._._escaped");
        assert_eq!(sanitize_file_component("mp4\n"), "mp4_");
        assert_eq!(sanitize_file_component(".."), ".");
    }

    #[test]
    fn test_short_token() {
        let a = short_token();
        let b = short_token();
        assert_eq!(a.len(), 9);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
