pub mod gpu;
pub mod window;

pub use gpu::{OverlayFrame, WgpuDevice};
pub use window::run;
