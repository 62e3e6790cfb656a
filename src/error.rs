//! Process-level error type.
//!
//! Every failure that can abort a command carries the exit code it should
//! produce, so `main` stays a one-liner. Exit code conventions:
//!
//! - 2: bad input (paths, flags, unreadable/structurally invalid files)
//! - 3: no usable data (every row dropped during cleaning)
//! - 4: runtime failures (terminal setup, drawing)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    /// Bad input: paths, flags, unreadable or structurally invalid files.
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            exit_code: 2,
            message: message.into(),
        }
    }

    /// Structurally fine input that left no usable data.
    pub fn data(message: impl Into<String>) -> Self {
        Self {
            exit_code: 3,
            message: message.into(),
        }
    }

    /// Runtime failures: terminal setup, event handling, drawing.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            exit_code: 4,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
