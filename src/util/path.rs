use std::path::Path;

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~` for the home directory. Unresolvable
/// input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// True for `.json` and `.toml` files, case-insensitive.
pub fn is_skill_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json") || e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unknown_variable_when_expanding_then_returns_input() {
        let input = "$SKILLTREE_SURELY_UNSET_VAR/skills.json";
        assert_eq!(expand_env_vars(input), input);
    }

    #[test]
    fn given_extensions_when_checking_document_then_accepts_json_and_toml() {
        assert!(is_skill_document(Path::new("a/skills.JSON")));
        assert!(is_skill_document(Path::new("skills.toml")));
        assert!(!is_skill_document(Path::new("skills.yaml")));
        assert!(!is_skill_document(Path::new("skills")));
    }
}
