use serde::Serialize;
use strum::AsRefStr;

/// Opaque 2D drawing context: path construction, fill/stroke with colour,
/// opacity and width, and a paint state stack.
pub trait DrawingSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);

    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_line_width(&mut self, width: f64);

    fn stroke(&mut self);
    fn fill(&mut self);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SurfaceCommand {
    Resize { width: f64, height: f64 },
    Clear,
    Save,
    Restore,
    BeginPath,
    ClosePath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64 },
    StrokeStyle(String),
    FillStyle(String),
    GlobalAlpha(f64),
    LineWidth(f64),
    Stroke,
    Fill,
}

/// Headless surface that records every call. Used for tests and for
/// measuring what a frame would paint.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<SurfaceCommand>,
    depth: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Commands since the last `clear`, i.e. the current frame.
    pub fn frame(&self) -> &[SurfaceCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == SurfaceCommand::Clear)
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn frame_count(&self) -> usize {
        self.commands.iter().filter(|c| **c == SurfaceCommand::Clear).count()
    }

    /// Open `save` calls not yet matched by `restore`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.push(SurfaceCommand::Resize { width, height });
    }

    fn clear(&mut self) {
        self.commands.push(SurfaceCommand::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(SurfaceCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(SurfaceCommand::Restore);
    }

    fn begin_path(&mut self) {
        self.commands.push(SurfaceCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(SurfaceCommand::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(SurfaceCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(SurfaceCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(SurfaceCommand::Arc { x, y, radius, start_angle, end_angle });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(SurfaceCommand::StrokeStyle(color.to_string()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.commands.push(SurfaceCommand::FillStyle(color.to_string()));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(SurfaceCommand::GlobalAlpha(alpha));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(SurfaceCommand::LineWidth(width));
    }

    fn stroke(&mut self) {
        self.commands.push(SurfaceCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(SurfaceCommand::Fill);
    }
}
