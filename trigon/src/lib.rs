pub mod camera;
pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod overlay;
pub mod renderer;
pub mod shader;
pub mod transform;

pub use camera::{CameraInput, CameraView, FlyCamera};
pub use config::AppConfig;
pub use device::{GraphicsDevice, RecordingDevice};
pub use error::{RenderError, RenderResult};
pub use model::{MeshData, Model, ModelSource, ObjLoader};
pub use overlay::RenderSettings;
pub use renderer::FrameRenderer;
pub use transform::{FrameTransforms, Viewport};
