//! Startup configuration. Built once (defaults, optional TOML file, then
//! command-line overrides) and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::driver::{InputEvent, Key};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub full_screen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Demo".to_owned(),
            width: 800,
            height: 600,
            full_screen: false,
        }
    }
}

/// Viewport rectangle as fractions of the window.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub z_order: u16,
    pub background: [f32; 3],
}

impl ViewportConfig {
    pub fn left(&self) -> f32 {
        (1.0 - self.width) * 0.5
    }

    pub fn top(&self) -> f32 {
        (1.0 - self.height) * 0.5
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 0.95,
            height: 0.95,
            z_order: 100,
            background: [0.2, 0.2, 0.2],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    pub fov_y_deg: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.5, 0.5, 1.5],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_y_deg: 45.0,
            near_clip: 0.01,
            far_clip: 100.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TorusConfig {
    pub loop_radius: f32,
    pub circle_radius: f32,
    pub loop_samples: u32,
    pub circle_samples: u32,
}

impl Default for TorusConfig {
    fn default() -> Self {
        Self {
            loop_radius: 0.6,
            circle_radius: 0.2,
            loop_samples: 90,
            circle_samples: 30,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CylinderConfig {
    pub start: f32,
    pub length: f32,
    pub radius: f32,
    pub resolution: u32,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            start: -0.5,
            length: 1.0,
            radius: 1.0,
            resolution: 120,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration: f32,
    pub steps: usize,
    pub scale: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: std::f32::consts::TAU,
            steps: 36,
            scale: 0.8,
        }
    }
}

/// A key event fed to the driver on a given frame (1-based).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ScriptedInput {
    pub frame: u32,
    pub key: Key,
    #[serde(default)]
    pub release: bool,
}

impl ScriptedInput {
    pub fn event(&self) -> InputEvent {
        if self.release {
            InputEvent::Released(self.key)
        } else {
            InputEvent::Pressed(self.key)
        }
    }
}

/// Headless frame loop settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub frames: u32,
    pub dt: f32,
    pub effect: u8,
    pub export_dir: Option<PathBuf>,
    pub input: Vec<ScriptedInput>,
}

impl RunConfig {
    /// Events scheduled for `frame`, in file order.
    pub fn events_for(&self, frame: u32) -> Vec<InputEvent> {
        self.input
            .iter()
            .filter(|i| i.frame == frame)
            .map(ScriptedInput::event)
            .collect()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            dt: 1.0 / 60.0,
            effect: 0,
            export_dir: None,
            input: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub material_directory: PathBuf,
    pub torus: TorusConfig,
    pub cylinder: CylinderConfig,
    pub animation: AnimationConfig,
    pub run: RunConfig,
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply `--key=value` overrides. Unknown flags are left to the caller.
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if let Some(v) = arg.strip_prefix("--size=") {
                let (w, h) = v
                    .split_once('x')
                    .or_else(|| v.split_once('X'))
                    .ok_or_else(|| invalid("size", format!("expected WxH, got '{v}'")))?;
                self.window.width = parse("size", w)?;
                self.window.height = parse("size", h)?;
            } else if let Some(v) = arg.strip_prefix("--frames=") {
                self.run.frames = parse("frames", v)?;
            } else if let Some(v) = arg.strip_prefix("--dt=") {
                self.run.dt = parse("dt", v)?;
            } else if let Some(v) = arg.strip_prefix("--effect=") {
                self.run.effect = parse("effect", v)?;
            } else if let Some(v) = arg.strip_prefix("--steps=") {
                self.animation.steps = parse("steps", v)?;
            } else if let Some(v) = arg.strip_prefix("--export-dir=") {
                self.run.export_dir = Some(PathBuf::from(v));
            } else if let Some(v) = arg.strip_prefix("--materials=") {
                self.material_directory = PathBuf::from(v);
            }
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero".into()));
        }
        if !(self.run.dt.is_finite() && self.run.dt >= 0.0) {
            return Err(invalid("dt", format!("must be a non-negative number, got {}", self.run.dt)));
        }
        let cam = &self.camera;
        if !(cam.near_clip > 0.0 && cam.far_clip > cam.near_clip) {
            return Err(invalid(
                "camera",
                format!("need 0 < near ({}) < far ({})", cam.near_clip, cam.far_clip),
            ));
        }
        Ok(())
    }

    /// Aspect ratio of the viewport in pixels.
    pub fn aspect(&self) -> f32 {
        let w = self.window.width as f32 * self.viewport.width;
        let h = self.window.height as f32 * self.viewport.height;
        w / h.max(1.0)
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .parse::<T>()
        .map_err(|_| invalid(key, format!("cannot parse '{value}'")))
}
