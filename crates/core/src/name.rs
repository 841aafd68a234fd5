//! Name comparison used by the duplicate-name checks.

/// Canonical form of a display name: surrounding whitespace dropped,
/// lowercased.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive, whitespace-tolerant name equality.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case_and_padding() {
        assert!(names_match("Ventas", "  ventas "));
        assert!(names_match("ÁREA", "área"));
        assert!(!names_match("Ventas", "Venta"));
    }
}
