//! Animation clips and playback
//!
//! Clips hold translation/rotation/scale keyframe channels targeting model
//! nodes. An [`AnimationPlayer`] advances a clip by frame delta time and
//! loops at the clip duration; sampling writes interpolated values over a
//! node pose.

use cgmath::{InnerSpace, Quaternion, Vector3};

use super::NodeTransform;

/// Keyframe interpolation mode
///
/// Cubic spline samplers are reduced to their keyframe values at load time,
/// so only these two modes exist at playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
}

/// Values carried by a channel, one entry per keyframe time
#[derive(Debug, Clone)]
pub enum ChannelValues {
    Translations(Vec<Vector3<f32>>),
    Rotations(Vec<Quaternion<f32>>),
    Scales(Vec<Vector3<f32>>),
}

impl ChannelValues {
    fn len(&self) -> usize {
        match self {
            ChannelValues::Translations(v) | ChannelValues::Scales(v) => v.len(),
            ChannelValues::Rotations(v) => v.len(),
        }
    }
}

/// A single animated property of a single node
#[derive(Debug, Clone)]
pub struct Channel {
    pub node: usize,
    pub interpolation: Interpolation,
    /// Keyframe times in seconds, strictly increasing
    pub times: Vec<f32>,
    pub values: ChannelValues,
}

/// A named animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds; the largest keyframe time across all channels
    pub duration: f32,
    pub channels: Vec<Channel>,
}

/// Playback state for one clip at a time
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clip: Option<usize>,
    pub time: f32,
    pub playing: bool,
    pub speed: f32,
    pub looping: bool,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            clip: None,
            time: 0.0,
            playing: false,
            speed: 1.0,
            looping: true,
        }
    }

    /// Starts playing a clip from the beginning
    pub fn play(&mut self, clip_index: usize) {
        self.clip = Some(clip_index);
        self.time = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    pub fn current_clip(&self) -> Option<usize> {
        self.clip
    }

    /// Advances playback by `delta` seconds of wall time
    pub fn advance(&mut self, delta: f32, clips: &[AnimationClip]) {
        if !self.playing {
            return;
        }
        let Some(clip) = self.clip.and_then(|index| clips.get(index)) else {
            return;
        };

        self.time += delta * self.speed;

        if clip.duration <= 0.0 {
            self.time = 0.0;
        } else if self.looping {
            self.time = self.time.rem_euclid(clip.duration);
        } else if self.time >= clip.duration {
            self.time = clip.duration;
            self.playing = false;
        }
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples every channel of a clip at `time`, overwriting the targeted
/// properties in `pose`. Untargeted properties keep their rest values.
pub fn sample_clip(clip: &AnimationClip, time: f32, pose: &mut [NodeTransform]) {
    for channel in &clip.channels {
        if channel.times.is_empty() || channel.values.len() != channel.times.len() {
            continue;
        }
        let Some(target) = pose.get_mut(channel.node) else {
            continue;
        };

        let (left, right, factor) = keyframe_span(&channel.times, time);
        let factor = match channel.interpolation {
            Interpolation::Step => 0.0,
            Interpolation::Linear => factor,
        };

        match &channel.values {
            ChannelValues::Translations(values) => {
                target.translation = lerp_vec3(values[left], values[right], factor);
            }
            ChannelValues::Scales(values) => {
                target.scale = lerp_vec3(values[left], values[right], factor);
            }
            ChannelValues::Rotations(values) => {
                target.rotation = slerp_shortest(values[left], values[right], factor);
            }
        }
    }
}

/// Finds the keyframe pair bracketing `time` and the blend factor between
/// them. Times outside the keyframe range clamp to the nearest endpoint.
fn keyframe_span(times: &[f32], time: f32) -> (usize, usize, f32) {
    let last = times.len() - 1;
    if time <= times[0] {
        return (0, 0, 0.0);
    }
    if time >= times[last] {
        return (last, last, 0.0);
    }

    let right = times.partition_point(|&t| t <= time);
    let left = right - 1;
    let span = times[right] - times[left];
    let factor = if span > 0.0 {
        (time - times[left]) / span
    } else {
        0.0
    };
    (left, right, factor)
}

fn lerp_vec3(a: Vector3<f32>, b: Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t
}

/// Spherical interpolation along the shorter arc
fn slerp_shortest(a: Quaternion<f32>, b: Quaternion<f32>, t: f32) -> Quaternion<f32> {
    let b = if a.dot(b) < 0.0 { -b } else { b };
    a.slerp(b, t).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rad, Rotation3, Zero};

    fn translation_clip(interpolation: Interpolation) -> AnimationClip {
        AnimationClip {
            name: "move".to_string(),
            duration: 2.0,
            channels: vec![Channel {
                node: 0,
                interpolation,
                times: vec![0.0, 2.0],
                values: ChannelValues::Translations(vec![
                    Vector3::zero(),
                    Vector3::new(4.0, 0.0, 0.0),
                ]),
            }],
        }
    }

    #[test]
    fn test_linear_translation_interpolates() {
        let clip = translation_clip(Interpolation::Linear);
        let mut pose = vec![NodeTransform::identity()];
        sample_clip(&clip, 1.0, &mut pose);
        assert!((pose[0].translation.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_step_interpolation_holds_left_keyframe() {
        let clip = translation_clip(Interpolation::Step);
        let mut pose = vec![NodeTransform::identity()];
        sample_clip(&clip, 1.9, &mut pose);
        assert_eq!(pose[0].translation.x, 0.0);
    }

    #[test]
    fn test_sampling_clamps_outside_range() {
        let clip = translation_clip(Interpolation::Linear);
        let mut pose = vec![NodeTransform::identity()];
        sample_clip(&clip, -1.0, &mut pose);
        assert_eq!(pose[0].translation.x, 0.0);
        sample_clip(&clip, 10.0, &mut pose);
        assert_eq!(pose[0].translation.x, 4.0);
    }

    #[test]
    fn test_rotation_slerp_midpoint() {
        let a = Quaternion::from_angle_y(Rad(0.0));
        let b = Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2));
        let clip = AnimationClip {
            name: "turn".to_string(),
            duration: 1.0,
            channels: vec![Channel {
                node: 0,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: ChannelValues::Rotations(vec![a, b]),
            }],
        };

        let mut pose = vec![NodeTransform::identity()];
        sample_clip(&clip, 0.5, &mut pose);

        let expected = Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_4));
        assert!(pose[0].rotation.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn test_player_loops_at_duration() {
        let clips = vec![translation_clip(Interpolation::Linear)];
        let mut player = AnimationPlayer::new();
        player.play(0);

        player.advance(1.5, &clips);
        assert!((player.time - 1.5).abs() < 1e-5);

        player.advance(1.0, &clips);
        assert!((player.time - 0.5).abs() < 1e-5);
        assert!(player.playing);
    }

    #[test]
    fn test_player_without_looping_stops_at_end() {
        let clips = vec![translation_clip(Interpolation::Linear)];
        let mut player = AnimationPlayer::new();
        player.looping = false;
        player.play(0);

        player.advance(5.0, &clips);
        assert_eq!(player.time, 2.0);
        assert!(!player.playing);
    }

    #[test]
    fn test_player_speed_scales_advance() {
        let clips = vec![translation_clip(Interpolation::Linear)];
        let mut player = AnimationPlayer::new();
        player.speed = 0.5;
        player.play(0);

        player.advance(1.0, &clips);
        assert!((player.time - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_paused_player_does_not_advance() {
        let clips = vec![translation_clip(Interpolation::Linear)];
        let mut player = AnimationPlayer::new();
        player.play(0);
        player.playing = false;
        player.advance(1.0, &clips);
        assert_eq!(player.time, 0.0);
    }
}
