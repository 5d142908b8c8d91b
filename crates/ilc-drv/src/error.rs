//! Top-level driver error type, per spec.md §7's code-gen/I/O diagnostic
//! kind: unsupported type, missing assembler tool, subprocess failure,
//! and filesystem write failure are all represented here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("{0} diagnostic(s) reported, aborting")]
    HasDiagnostics(usize),

    #[error("code generation failed: {0}")]
    Codegen(#[from] ilc_gen::CodegenError),

    #[error("assembler not found at {0}; set IL_ASSEMBLER_PATH to override")]
    AssemblerMissing(String),

    #[error("archiver not found at {0}; set IL_ARCHIVER_PATH to override")]
    ArchiverMissing(String),

    #[error("assembler failed on {file}: {stderr}")]
    AssemblerFailed { file: String, stderr: String },

    #[error("archiver failed: {0}")]
    ArchiverFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_has_diagnostics_message() {
        let err = DriverError::HasDiagnostics(3);
        assert_eq!(err.to_string(), "3 diagnostic(s) reported, aborting");
    }

    #[test]
    fn renders_assembler_missing_message() {
        let err = DriverError::AssemblerMissing("lib/assembler.jar".to_string());
        assert!(err.to_string().contains("IL_ASSEMBLER_PATH"));
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DriverError = io_err.into();
        assert!(matches!(err, DriverError::Io(_)));
    }
}
