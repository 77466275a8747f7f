//! WGSL stage compilation and program linking, validated offline with naga
//! so failures surface before any GPU object exists.

mod link;

use std::fmt;
use std::path::{Path, PathBuf};

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{RenderError, RenderResult};

pub use link::{LinkedProgram, LinkedStage, UniformEntry, UniformLocation, UniformTable, UniformType, link};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// A parsed and validated single-stage module. Consumed by [`link`].
#[derive(Debug)]
pub struct CompiledStage {
    pub kind: StageKind,
    pub path: PathBuf,
    pub source: String,
    pub module: naga::Module,
    pub entry_point: String,
}

pub fn compile_stage(kind: StageKind, path: impl AsRef<Path>) -> RenderResult<CompiledStage> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| RenderError::ShaderCompile {
        stage: kind,
        path: path.to_path_buf(),
        diagnostic: err.to_string(),
    })?;
    compile_source(kind, path, source)
}

pub fn compile_source(
    kind: StageKind,
    path: impl Into<PathBuf>,
    source: String,
) -> RenderResult<CompiledStage> {
    let path = path.into();
    let fail = |diagnostic: String| RenderError::ShaderCompile {
        stage: kind,
        path: path.clone(),
        diagnostic,
    };

    let module = naga::front::wgsl::parse_str(&source)
        .map_err(|err| fail(err.emit_to_string(&source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| fail(err.as_inner().to_string()))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|entry| entry.stage == kind.naga_stage())
        .map(|entry| entry.name.clone())
        .ok_or_else(|| fail(format!("no @{kind} entry point")))?;

    tracing::debug!(
        target: "shader",
        stage = %kind,
        path = %path.display(),
        entry_point = %entry_point,
        "compiled shader stage"
    );

    Ok(CompiledStage {
        kind,
        path,
        source,
        module,
        entry_point,
    })
}
