//! Headless frame driver: input handling, animation time and the material
//! parameters the compositor reads each frame.

use core_types::{CoreError, CoreResult};
use corelib::animation::{AnimationState, Pose};
use corelib::scene::SceneGraph;

/// Keys the driver reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub enum Key {
    Space,
    Escape,
    A,
    Q,
    B,
    C,
    D,
    E,
    F,
    G,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Screen-space effect selector passed to the compositor material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectCode(u8);

impl EffectCode {
    pub const MAX: u8 = 6;

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for EffectCode {
    type Error = CoreError;

    fn try_from(code: u8) -> CoreResult<Self> {
        if code > Self::MAX {
            return Err(CoreError::InvalidEffectCode(code));
        }
        Ok(Self(code))
    }
}

/// What one tick produced, for logging.
#[derive(Clone, Copy, Debug)]
pub struct FrameReport {
    pub frame: u64,
    pub time_position: f32,
    pub pose: Pose,
    pub effect: EffectCode,
    pub compositor_time: f32,
}

pub struct FrameDriver {
    animation: AnimationState,
    animating: bool,
    space_down: bool,
    effect: EffectCode,
    shading_type: u8,
    elapsed: f32,
    window_height: u32,
    frame: u64,
}

impl FrameDriver {
    /// Take over `animation`, enabling it in looping mode.
    pub fn new(mut animation: AnimationState, window_height: u32) -> Self {
        animation.set_enabled(true);
        animation.set_loop(true);
        Self {
            animation,
            animating: true,
            space_down: false,
            effect: EffectCode::default(),
            shading_type: 0,
            elapsed: 0.0,
            window_height: window_height.max(1),
            frame: 0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    #[inline]
    pub fn effect(&self) -> EffectCode {
        self.effect
    }

    #[inline]
    pub fn shading_type(&self) -> u8 {
        self.shading_type
    }

    #[inline]
    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Idempotent; codes above 6 are rejected and leave the effect as is.
    pub fn set_effect(&mut self, code: u8) -> CoreResult<()> {
        let effect = EffectCode::try_from(code)?;
        if effect != self.effect {
            log::debug!("Effect {} -> {}", self.effect.get(), effect.get());
        }
        self.effect = effect;
        Ok(())
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(Key::Space) => self.space_down = true,
            InputEvent::Released(Key::Space) if self.space_down => {
                self.animating = !self.animating;
                self.space_down = false;
                log::info!("Animation {}", if self.animating { "resumed" } else { "paused" });
            }
            InputEvent::Pressed(Key::Escape) => self.animation.set_time_position(0.0),
            InputEvent::Pressed(Key::A) => self.shading_type = 1,
            InputEvent::Pressed(Key::Q) => self.shading_type = 0,
            InputEvent::Pressed(key) => {
                if let Some(code) = effect_for(key) {
                    self.effect = EffectCode(code);
                }
            }
            InputEvent::Released(_) => {}
        }
    }

    /// Advance animation (when running) and compositor time by `dt`.
    pub fn advance(&mut self, dt: f32) {
        if self.animating {
            self.animation.add_time(dt);
        }
        self.elapsed += dt;
    }

    /// Compositor scan-line time: hundredths of a second wrapped to the
    /// window height.
    pub fn compositor_time(&self) -> f32 {
        ((self.elapsed * 100.0) as u64 % u64::from(self.window_height)) as f32
    }

    /// One frame: advance time, apply input, pose the animated node.
    /// Input lands after the time step, so a rewind shows on this frame.
    pub fn tick(
        &mut self,
        dt: f32,
        events: &[InputEvent],
        scene: &mut SceneGraph,
    ) -> CoreResult<FrameReport> {
        self.advance(dt);
        for &event in events {
            self.handle(event);
        }
        self.animation.apply(scene)?;
        self.frame += 1;

        Ok(FrameReport {
            frame: self.frame,
            time_position: self.animation.time_position(),
            pose: self.animation.pose(),
            effect: self.effect,
            compositor_time: self.compositor_time(),
        })
    }
}

fn effect_for(key: Key) -> Option<u8> {
    match key {
        Key::B => Some(1),
        Key::C => Some(2),
        Key::D => Some(3),
        Key::E => Some(4),
        Key::F => Some(5),
        Key::G => Some(6),
        _ => None,
    }
}
