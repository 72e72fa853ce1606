//! Validation report rendering

use std::fmt;

const SUCCESS_LINE: &str = "Manifest successfully validated, no errors found!";
const ERROR_HEADER: &str = "Errors found within manifest:";
const ERROR_FOOTER: &str = "Please correct mistakes and validate again.";

/// Final pass/fail report over the collected error lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// True when no row produced an error
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Human-readable report text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return f.write_str(SUCCESS_LINE);
        }

        f.write_str(ERROR_HEADER)?;
        for line in &self.errors {
            write!(f, "\n\t{}", line)?;
        }
        write!(f, "\n{}", ERROR_FOOTER)
    }
}
