//! Caption text shown under a pattern

/// Separator between two distinct source strings
pub const LABEL_SEPARATOR: &str = " / ";

/// Case-insensitive equality of the two source strings
pub fn same_text(text_h: &str, text_v: &str) -> bool {
    text_h.to_lowercase() == text_v.to_lowercase()
}

/// Upper-cased caption: the single string when both are equal, both joined otherwise
pub fn caption(text_h: &str, text_v: &str) -> String {
    if same_text(text_h, text_v) {
        text_h.to_uppercase()
    } else {
        format!(
            "{}{}{}",
            text_h.to_uppercase(),
            LABEL_SEPARATOR,
            text_v.to_uppercase()
        )
    }
}

/// Distinct source strings, in order, for layouts that show text directly
pub fn distinct_texts<'a>(text_h: &'a str, text_v: &'a str) -> Vec<&'a str> {
    if same_text(text_h, text_v) {
        vec![text_h]
    } else {
        vec![text_h, text_v]
    }
}
