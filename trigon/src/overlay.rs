//! Debug panel drawn with egui once per frame.

/// State the panel writes and the frame draw reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSettings {
    pub wireframe: bool,
}

pub fn define_gui(ctx: &egui::Context, title: &str, settings: &mut RenderSettings) {
    egui::Window::new(title)
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Visibility");
            ui.checkbox(&mut settings.wireframe, "Wireframe");
            let frame_seconds = ctx.input(|input| input.stable_dt);
            ui.label(frame_time_label(frame_seconds));
        });
}

pub fn frame_time_label(frame_seconds: f32) -> String {
    let fps = if frame_seconds > 0.0 {
        1.0 / frame_seconds
    } else {
        0.0
    };
    format!(
        "Application average {:.3} ms/frame ({:.1} FPS)",
        frame_seconds * 1000.0,
        fps
    )
}
