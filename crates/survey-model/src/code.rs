//! Question-code normalization for cross-edition matching.
//!
//! Different editions of the same questionnaire prefix their element codes
//! with a single survey-type letter (`F`/`f` or `I`/`i`). Stripping that
//! prefix yields the stable code used to match questions across editions.

/// Known data-entry typos in source exports, substituted after prefix
/// stripping. Keys are full codes, matched exactly.
const CODE_ALIASES: &[(&str, &str)] = &[("IPRErgenisse", "IPRErgebnisse")];

/// Strip the survey-type prefix from a question code.
///
/// The first character is dropped only when it is one of `F`, `f`, `I`, `i`
/// and the second character is an uppercase letter. The uppercase
/// requirement keeps the rule idempotent: a stripped code like
/// `UnternehmenArt` no longer matches, and a code such as `Istartup` is a
/// word in its own right and stays untouched. Codes starting with the
/// acronym `IPR` are never stripped.
///
/// The rule is purely syntactic. A code that legitimately begins with a
/// trigger letter followed by an uppercase letter is stripped too; such
/// cases are handled by extending [`CODE_ALIASES`], not by special-casing
/// here.
pub fn normalize_code(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    if code.starts_with("IPR") {
        return apply_alias(code).to_string();
    }
    let mut chars = code.chars();
    let stripped = match (chars.next(), chars.next()) {
        (Some(first), Some(second))
            if matches!(first, 'F' | 'f' | 'I' | 'i') && second.is_uppercase() =>
        {
            &code[first.len_utf8()..]
        }
        _ => code,
    };
    apply_alias(stripped).to_string()
}

fn apply_alias(code: &str) -> &str {
    CODE_ALIASES
        .iter()
        .find(|(variant, _)| *variant == code)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_final_and_impact_prefixes() {
        assert_eq!(normalize_code("FUnternehmenArt"), "UnternehmenArt");
        assert_eq!(normalize_code("IUnternehmenArt"), "UnternehmenArt");
        assert_eq!(normalize_code("fGruendungsjahr"), "Gruendungsjahr");
        assert_eq!(normalize_code("iGruendungsjahr"), "Gruendungsjahr");
    }

    #[test]
    fn lowercase_second_character_is_not_a_prefix() {
        assert_eq!(normalize_code("Istartup"), "Istartup");
        assert_eq!(normalize_code("Frage"), "Frage");
    }

    #[test]
    fn empty_and_single_character_codes_pass_through() {
        assert_eq!(normalize_code(""), "");
        assert_eq!(normalize_code("F"), "F");
        assert_eq!(normalize_code("X"), "X");
    }

    #[test]
    fn ipr_acronym_is_not_stripped() {
        assert_eq!(normalize_code("IPRSchutz"), "IPRSchutz");
    }

    #[test]
    fn alias_table_fixes_known_typos() {
        assert_eq!(normalize_code("IPRErgenisse"), "IPRErgebnisse");
        // Alias also applies after a prefix strip.
        assert_eq!(normalize_code("FIPRErgenisse"), "IPRErgebnisse");
    }

    #[test]
    fn normalization_is_idempotent_on_samples() {
        for code in [
            "FUnternehmenArt",
            "iGruendungsjahr",
            "Istartup",
            "IPRErgenisse",
            "IPRSchutz",
            "",
            "F",
            "ÄUmlaut",
        ] {
            let once = normalize_code(code);
            assert_eq!(normalize_code(&once), once, "not idempotent for {code:?}");
        }
    }
}
