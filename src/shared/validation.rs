use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "AdminBucle"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Regex for caller-supplied SKUs
    /// Upper or lower case alphanumerics separated by single hyphens
    /// - Valid: "CIL-ROSA-001", "TUBO-CO2-STD", "abc123"
    /// - Invalid: "-CIL", "CIL-", "CIL--ROSA", "CIL ROSA"
    pub static ref SKU_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("AdminBucle"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(USERNAME_REGEX.is_match("armando_paredes2"));
        assert!(!USERNAME_REGEX.is_match("2armando"));
        assert!(!USERNAME_REGEX.is_match("armando paredes"));
        assert!(!USERNAME_REGEX.is_match(""));
    }

    #[test]
    fn test_sku_regex_valid() {
        assert!(SKU_REGEX.is_match("CIL-ROSA-001"));
        assert!(SKU_REGEX.is_match("TUBO-CO2-STD"));
        assert!(SKU_REGEX.is_match("AUTO-CIL-1A2B"));
        assert!(SKU_REGEX.is_match("x1"));
    }

    #[test]
    fn test_sku_regex_invalid() {
        assert!(!SKU_REGEX.is_match("-CIL")); // starts with hyphen
        assert!(!SKU_REGEX.is_match("CIL-")); // ends with hyphen
        assert!(!SKU_REGEX.is_match("CIL--ROSA")); // double hyphen
        assert!(!SKU_REGEX.is_match("CIL ROSA")); // space
        assert!(!SKU_REGEX.is_match(""));
    }
}
