use std::path::PathBuf;

use thiserror::Error;

use crate::shader::StageKind;

pub type RenderResult<T> = Result<T, RenderError>;

/// Failures that stop setup. GPU errors seen while uploading or drawing
/// are logged instead and never reach this type, with the single
/// exception of the check that follows program creation.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile {stage} shader `{path}`: {diagnostic}")]
    ShaderCompile {
        stage: StageKind,
        path: PathBuf,
        diagnostic: String,
    },
    #[error("failed to link program: {0}")]
    Link(String),
    #[error("failed to load model `{path}`")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
    #[error("program must be created before geometry is uploaded")]
    ProgramMissing,
    #[error("GPU reported an error while {context}: {diagnostic}")]
    Device {
        context: &'static str,
        diagnostic: String,
    },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
