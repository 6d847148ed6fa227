//! JSON pointer paths (RFC 6901) used to locate issues.

/// Escape a single reference token.
pub fn encode_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append a reference token to an existing pointer.
pub fn append(pointer: &str, token: &str) -> String {
    let mut child = String::with_capacity(pointer.len() + token.len() + 1);
    child.push_str(pointer);
    child.push('/');
    child.push_str(&encode_token(token));
    child
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_plain() {
        assert_eq!(append("", "bgTarget"), "/bgTarget");
        assert_eq!(append("/basalRateSchedules/one", "0"), "/basalRateSchedules/one/0");
    }

    #[test]
    fn test_escapes_reserved_characters() {
        assert_eq!(append("", "a/b"), "/a~1b");
        assert_eq!(append("", "m~n"), "/m~0n");
        assert_eq!(append("", ""), "/");
    }
}
