use isolang::Language;

/// ISO 639-1 code → English language name. Unknown codes are returned
/// unchanged.
pub fn language_name(code: &str) -> String {
    let code = code.trim().to_ascii_lowercase();
    match Language::from_639_1(&code) {
        Some(language) => language.to_name().to_string(),
        None => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(language_name("ko"), "Korean");
        assert_eq!(language_name("EN"), "English");
        assert_eq!(language_name("ja"), "Japanese");
    }

    #[test]
    fn less_common_codes() {
        assert_eq!(language_name("sq"), "Albanian");
        assert_eq!(language_name("bs"), "Bosnian");
        assert_eq!(language_name("af"), "Afrikaans");
    }

    #[test]
    fn unknown_code_passes_through() {
        assert_eq!(language_name("cn"), "cn");
        assert_eq!(language_name("xx"), "xx");
    }
}
