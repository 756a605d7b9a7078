//! Keyframe tracks for periodic node rotation and the per-frame state that
//! plays them back.
//!
//! A track holds evenly spaced keys in `[0, duration)`. Sampling wraps time
//! modulo the duration and blends linearly between neighbouring keys, the
//! last key blending back into the first.

use core_types::{CoreError, CoreResult};

use crate::scene::{NodeId, SceneGraph};
use crate::transform::Transform;
use crate::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub rotation: Quat,
    pub scale: f32,
}

/// Interpolated rotation and uniform scale at some time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub rotation: Quat,
    pub scale: f32,
}

#[derive(Clone, Debug)]
pub struct AnimationTrack {
    target: NodeId,
    duration: f32,
    keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    fn step(&self) -> f32 {
        self.duration / self.keyframes.len() as f32
    }

    /// Pose at `time`, wrapped into `[0, duration)`.
    pub fn sample(&self, time: f32) -> Pose {
        let n = self.keyframes.len();
        let t = time.rem_euclid(self.duration);
        let step = self.step();
        let k = ((t / step) as usize).min(n - 1);
        let a = &self.keyframes[k];
        let b = &self.keyframes[(k + 1) % n];
        let alpha = ((t - a.time) / step).clamp(0.0, 1.0);

        Pose {
            rotation: a.rotation.lerp(b.rotation, alpha),
            scale: a.scale + (b.scale - a.scale) * alpha,
        }
    }
}

/// Builds spin tracks: rotation by `-t` radians about `axis` at each key
/// time `t`, constant uniform `scale`.
#[derive(Clone, Copy, Debug)]
pub struct KeyframeAnimationBuilder {
    pub axis: Vec3,
    pub scale: f32,
}

impl Default for KeyframeAnimationBuilder {
    fn default() -> Self {
        Self {
            axis: Vec3::Y,
            scale: 1.0,
        }
    }
}

impl KeyframeAnimationBuilder {
    pub fn new(axis: Vec3, scale: f32) -> Self {
        Self { axis, scale }
    }

    pub fn build(&self, target: NodeId, duration: f32, num_steps: usize) -> CoreResult<AnimationTrack> {
        if !(duration.is_finite() && duration > 0.0) || num_steps < 2 {
            return Err(CoreError::InvalidDuration {
                duration,
                steps: num_steps,
            });
        }

        let axis = self
            .axis
            .try_normalize()
            .ok_or(CoreError::InvalidAxis(self.axis.to_array()))?;
        let step = duration / num_steps as f32;
        let keyframes = (0..num_steps)
            .map(|k| {
                let time = k as f32 * step;
                Keyframe {
                    time,
                    rotation: Quat::from_axis_angle(axis, -time),
                    scale: self.scale,
                }
            })
            .collect();

        Ok(AnimationTrack {
            target,
            duration,
            keyframes,
        })
    }
}

/// Playback cursor over a track. Created disabled and looping.
#[derive(Clone, Debug)]
pub struct AnimationState {
    track: AnimationTrack,
    base: Transform,
    time: f32,
    enabled: bool,
    looping: bool,
}

impl AnimationState {
    /// Bind `track` to its target node; the node's current local transform
    /// becomes the pose the keys are applied on top of.
    pub fn new(track: AnimationTrack, scene: &SceneGraph) -> CoreResult<Self> {
        let base = *scene
            .local(track.target)
            .ok_or_else(|| CoreError::NodeNotFound(format!("#{}", track.target.0)))?;
        Ok(Self {
            track,
            base,
            time: 0.0,
            enabled: false,
            looping: true,
        })
    }

    #[inline]
    pub fn track(&self) -> &AnimationTrack {
        &self.track
    }

    #[inline]
    pub fn time_position(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Jump to `time`, wrapped or clamped the same way as [`Self::add_time`].
    pub fn set_time_position(&mut self, time: f32) {
        let d = self.track.duration;
        self.time = if self.looping {
            time.rem_euclid(d)
        } else {
            time.clamp(0.0, d)
        };
    }

    /// Advance by `dt` seconds. Ignored while disabled.
    pub fn add_time(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        self.set_time_position(self.time + dt);
    }

    pub fn has_ended(&self) -> bool {
        !self.looping && self.time >= self.track.duration
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.track.sample(self.time)
    }

    /// Write the current pose into the target node.
    pub fn apply(&self, scene: &mut SceneGraph) -> CoreResult<()> {
        let pose = self.pose();
        let target = self.track.target;
        let local = scene
            .local_mut(target)
            .ok_or_else(|| CoreError::NodeNotFound(format!("#{}", target.0)))?;
        local.translation = self.base.translation;
        local.rotation = (self.base.rotation * pose.rotation).normalize();
        local.scale = self.base.scale * pose.scale;
        Ok(())
    }
}
