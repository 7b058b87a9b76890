use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ScanResult<T> = Result<T, ScanError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorCategory {
    InputValidationError,
    IoSystemError,
    InternalError,
}

impl ScanErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    category: ScanErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl ScanError {
    pub fn new(
        category: ScanErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ScanErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ScanErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ScanErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> ScanErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for ScanError {}

#[cfg(test)]
mod tests {
    use super::{ScanError, ScanErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (
                ScanErrorCategory::InputValidationError,
                2,
                "InputValidationError",
            ),
            (ScanErrorCategory::IoSystemError, 3, "IoSystemError"),
            (ScanErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, name) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_lines() {
        let error = ScanError::io_system("IO.SCAN_READ", "failed to read '15315_00012.dat'");

        assert_eq!(error.exit_code(), 3);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [IO.SCAN_READ] failed to read '15315_00012.dat'"
        );
        assert_eq!(error.fatal_exit_line(), "FATAL EXIT CODE: 3");
        assert_eq!(
            error.to_string(),
            "IoSystemError [IO.SCAN_READ] failed to read '15315_00012.dat'"
        );
    }

    #[test]
    fn internal_failures_exit_with_code_five() {
        let error = ScanError::internal("INTERNAL.JSON_RENDER", "key must be a string");

        assert_eq!(error.category(), ScanErrorCategory::InternalError);
        assert_eq!(error.exit_code(), 5);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INTERNAL.JSON_RENDER] key must be a string"
        );
    }
}
