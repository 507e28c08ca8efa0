//! Stable codes for input errors.
//!
//! ```
//! use sgmlx_util::diagnostic::DiagnosticCode;
//!
//! assert_eq!(DiagnosticCode::E_LEXER_NON_SGML_CHAR.as_str(), "E1001");
//! ```

/// A code of the form `{prefix}{number}`, the number padded to four digits
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// Letter class of the code
    pub prefix: &'static str,
    /// Number within the class
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// The printed form, e.g. `E1001`
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // input layer: E1xxx

    /// E1001: the cursor read a character the syntax declares non-SGML
    pub const E_LEXER_NON_SGML_CHAR: Self = Self::new("E", 1001);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_pads() {
        assert_eq!(DiagnosticCode::new("E", 7).as_str(), "E0007");
        assert_eq!(DiagnosticCode::E_LEXER_NON_SGML_CHAR.as_str(), "E1001");
    }

    #[test]
    fn test_display_and_debug() {
        let code = DiagnosticCode::E_LEXER_NON_SGML_CHAR;
        assert_eq!(code.to_string(), "E1001");
        assert_eq!(format!("{:?}", code), "DiagnosticCode(E1001)");
    }
}
