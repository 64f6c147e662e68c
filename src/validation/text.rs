use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block stripped after decomposition
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Upper-case a value and strip its diacritics.
///
/// Canonical decomposition (NFD) splits accented letters into base letter
/// plus combining mark; the marks are then dropped. Missing input yields an
/// empty string. The function is idempotent.
pub fn normalize_text<'a>(value: impl Into<Option<&'a str>>) -> String {
    let Some(value) = value.into() else {
        return String::new();
    };
    value
        .to_uppercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_strips_accents() {
        assert_eq!(normalize_text("Compañía Análisis, c.a."), "COMPANIA ANALISIS, C.A.");
        assert_eq!(normalize_text("mérida"), "MERIDA");
        assert_eq!(normalize_text("Ünïcödé"), "UNICODE");
    }

    #[test]
    fn missing_and_empty_input_yield_empty_string() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(Some("")), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "San Cristóbal",
            "straße",
            "ǰ",
            "Ωμέγα",
            "already UPPER 123",
            "tab\tand\nnewline",
        ];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(once.as_str()), once, "not idempotent for {s:?}");
            assert!(!once.chars().any(|c| COMBINING_MARKS.contains(&c)));
        }
    }
}
