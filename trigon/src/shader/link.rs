use std::collections::BTreeMap;

use naga::{AddressSpace, Binding, Handle, Module, Scalar, Type, TypeInner, VectorSize};

use super::{CompiledStage, StageKind};
use crate::error::{RenderError, RenderResult};

/// Mesh layout slots the vertex stage may read from.
const POSITION_LOCATION: u32 = 0;
const NORMAL_LOCATION: u32 = 1;

const UNIFORM_GROUP: u32 = 0;
const UNIFORM_BINDING: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedStage {
    pub label: String,
    pub source: String,
    pub entry_point: String,
}

/// Both stages plus the reflected uniform block. The stage objects it
/// was linked from no longer exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedProgram {
    pub vertex: LinkedStage,
    pub fragment: LinkedStage,
    pub uniforms: UniformTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Mat4,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformEntry {
    pub name: String,
    pub offset: u32,
    pub ty: UniformType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    pub offset: u32,
}

/// Layout of the group 0 / binding 0 uniform block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformTable {
    pub size: u32,
    pub entries: Vec<UniformEntry>,
}

impl UniformTable {
    /// Location of a `mat4x4<f32>` uniform, or `None` when the program
    /// has no such member.
    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.entries
            .iter()
            .find(|entry| entry.name == name && entry.ty == UniformType::Mat4)
            .map(|entry| UniformLocation {
                offset: entry.offset,
            })
    }
}

pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> RenderResult<LinkedProgram> {
    if vertex.kind != StageKind::Vertex || fragment.kind != StageKind::Fragment {
        return Err(RenderError::Link(format!(
            "expected vertex and fragment stages, got {} and {}",
            vertex.kind, fragment.kind
        )));
    }

    let vertex_entry = entry_function(&vertex)?;
    let fragment_entry = entry_function(&fragment)?;

    let mut vertex_inputs = BTreeMap::new();
    for argument in &vertex_entry.arguments {
        collect_locations(&vertex.module, argument.binding.as_ref(), argument.ty, &mut vertex_inputs);
    }
    check_vertex_inputs(&vertex_inputs)?;

    let mut vertex_outputs = BTreeMap::new();
    if let Some(result) = &vertex_entry.result {
        collect_locations(&vertex.module, result.binding.as_ref(), result.ty, &mut vertex_outputs);
    }

    let mut fragment_inputs = BTreeMap::new();
    for argument in &fragment_entry.arguments {
        collect_locations(&fragment.module, argument.binding.as_ref(), argument.ty, &mut fragment_inputs);
    }

    for (location, expected) in &fragment_inputs {
        match vertex_outputs.get(location) {
            None => {
                return Err(RenderError::Link(format!(
                    "fragment input at location {location} is not written by the vertex stage"
                )));
            }
            Some(produced) if produced != expected => {
                return Err(RenderError::Link(format!(
                    "location {location} type mismatch: vertex writes {produced:?}, fragment reads {expected:?}"
                )));
            }
            Some(_) => {}
        }
    }

    let vertex_uniforms = uniform_table(&vertex)?;
    let fragment_uniforms = uniform_table(&fragment)?;
    let uniforms = match (vertex_uniforms, fragment_uniforms) {
        (Some(v), Some(f)) if v != f => {
            return Err(RenderError::Link(
                "vertex and fragment stages declare different uniform blocks".to_string(),
            ));
        }
        (Some(table), _) | (None, Some(table)) => table,
        (None, None) => UniformTable::default(),
    };

    tracing::debug!(
        target: "shader",
        vertex = %vertex.path.display(),
        fragment = %fragment.path.display(),
        uniforms = uniforms.entries.len(),
        "linked program"
    );

    Ok(LinkedProgram {
        vertex: LinkedStage {
            label: vertex.path.display().to_string(),
            source: vertex.source,
            entry_point: vertex.entry_point,
        },
        fragment: LinkedStage {
            label: fragment.path.display().to_string(),
            source: fragment.source,
            entry_point: fragment.entry_point,
        },
        uniforms,
    })
}

fn entry_function(stage: &CompiledStage) -> RenderResult<&naga::Function> {
    stage
        .module
        .entry_points
        .iter()
        .find(|entry| entry.name == stage.entry_point)
        .map(|entry| &entry.function)
        .ok_or_else(|| {
            RenderError::Link(format!(
                "{} stage lost its entry point `{}`",
                stage.kind, stage.entry_point
            ))
        })
}

/// Flattens `@location` bindings, descending into IO structs.
fn collect_locations(
    module: &Module,
    binding: Option<&Binding>,
    ty: Handle<Type>,
    out: &mut BTreeMap<u32, TypeInner>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location, module.types[ty].inner.clone());
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.binding.as_ref(), member.ty, out);
                }
            }
        }
    }
}

fn check_vertex_inputs(inputs: &BTreeMap<u32, TypeInner>) -> RenderResult<()> {
    let vec3 = TypeInner::Vector {
        size: VectorSize::Tri,
        scalar: Scalar::F32,
    };
    for (location, ty) in inputs {
        if *location != POSITION_LOCATION && *location != NORMAL_LOCATION {
            return Err(RenderError::Link(format!(
                "vertex input at location {location} has no mesh stream \
                 (slot {POSITION_LOCATION} = position, slot {NORMAL_LOCATION} = normal)"
            )));
        }
        if *ty != vec3 {
            return Err(RenderError::Link(format!(
                "vertex input at location {location} must be vec3<f32>, found {ty:?}"
            )));
        }
    }
    Ok(())
}

fn uniform_table(stage: &CompiledStage) -> RenderResult<Option<UniformTable>> {
    let module = &stage.module;
    let mut found = None;

    for (_, global) in module.global_variables.iter() {
        if global.space != AddressSpace::Uniform {
            continue;
        }
        let name = global.name.clone().unwrap_or_default();
        let bound_at_block = global
            .binding
            .as_ref()
            .is_some_and(|b| b.group == UNIFORM_GROUP && b.binding == UNIFORM_BINDING);
        if !bound_at_block {
            return Err(RenderError::Link(format!(
                "{} stage uniform `{name}` must be bound at @group({UNIFORM_GROUP}) @binding({UNIFORM_BINDING})",
                stage.kind
            )));
        }
        if found.is_some() {
            return Err(RenderError::Link(format!(
                "{} stage declares more than one uniform block",
                stage.kind
            )));
        }

        let inner = &module.types[global.ty].inner;
        let size = inner.size(module.to_ctx());
        let entries = match inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .map(|member| UniformEntry {
                    name: member.name.clone().unwrap_or_default(),
                    offset: member.offset,
                    ty: uniform_type(&module.types[member.ty].inner),
                })
                .collect(),
            other => vec![UniformEntry {
                name,
                offset: 0,
                ty: uniform_type(other),
            }],
        };
        found = Some(UniformTable { size, entries });
    }

    Ok(found)
}

fn uniform_type(inner: &TypeInner) -> UniformType {
    match inner {
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar: Scalar::F32,
        } => UniformType::Mat4,
        _ => UniformType::Other,
    }
}
