//! Tap-to-bounce vertical hop.

use cairn_config::PhysicsConfig;

/// Whether the rock is sitting on the ground or airborne.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BounceState {
    Resting,
    Falling,
}

/// What happens when a falling rock reaches the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactPolicy {
    /// Stop dead on the first contact.
    pub stop_on_contact: bool,
    /// Fraction of impact speed returned upward on a rebound.
    pub restitution: f32,
    /// Impacts slower than this settle instead of rebounding.
    pub min_rebound_speed: f32,
}

impl Default for ContactPolicy {
    fn default() -> Self {
        Self {
            stop_on_contact: true,
            restitution: 0.45,
            min_rebound_speed: 0.08,
        }
    }
}

/// Vertical offset and velocity of the rock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsState {
    pub vertical_offset: f32,
    pub vertical_velocity: f32,
    pub is_falling: bool,
    pub rest_offset: f32,
}

/// Vertical offset at which a mesh with bounds bottom `min_y` (in model space,
/// before `scale`) just touches a ground plane at `ground_y`.
pub fn rest_offset_for(min_y: f32, scale: f32, ground_y: f32) -> f32 {
    ground_y - min_y * scale
}

/// Gravity/impulse integrator for the rock's vertical offset.
///
/// Constants are per frame, not per second: each [`step`](Self::step) adds
/// `gravity` to the velocity and the velocity to the offset.
#[derive(Clone, Debug)]
pub struct BounceSimulator {
    state: PhysicsState,
    gravity: f32,
    bounce_impulse: f32,
    policy: ContactPolicy,
}

impl BounceSimulator {
    /// Create a resting simulator at `rest_offset`.
    pub fn new(gravity: f32, bounce_impulse: f32, policy: ContactPolicy, rest_offset: f32) -> Self {
        Self {
            state: PhysicsState {
                vertical_offset: rest_offset,
                vertical_velocity: 0.0,
                is_falling: false,
                rest_offset,
            },
            gravity,
            bounce_impulse,
            policy,
        }
    }

    /// Create from the physics config section.
    pub fn from_config(config: &PhysicsConfig, rest_offset: f32) -> Self {
        Self::new(
            config.gravity,
            config.bounce_impulse,
            ContactPolicy {
                stop_on_contact: config.stop_on_contact,
                restitution: config.restitution,
                min_rebound_speed: config.min_rebound_speed,
            },
            rest_offset,
        )
    }

    pub fn state(&self) -> BounceState {
        if self.state.is_falling {
            BounceState::Falling
        } else {
            BounceState::Resting
        }
    }

    pub fn physics(&self) -> &PhysicsState {
        &self.state
    }

    pub fn offset(&self) -> f32 {
        self.state.vertical_offset
    }

    pub fn policy(&self) -> ContactPolicy {
        self.policy
    }

    /// Start a bounce. Ignored unless resting; returns whether it started.
    pub fn trigger(&mut self) -> bool {
        if self.state.is_falling {
            return false;
        }
        self.state.vertical_velocity = self.bounce_impulse;
        self.state.is_falling = true;
        tracing::debug!(impulse = self.bounce_impulse, "Bounce triggered");
        true
    }

    /// Advance one frame. No-op while resting.
    pub fn step(&mut self) {
        if !self.state.is_falling {
            return;
        }
        let s = &mut self.state;
        s.vertical_velocity += self.gravity;
        s.vertical_offset += s.vertical_velocity;

        if s.vertical_offset <= s.rest_offset {
            s.vertical_offset = s.rest_offset;
            let impact = s.vertical_velocity.abs();
            if !self.policy.stop_on_contact && impact > self.policy.min_rebound_speed {
                s.vertical_velocity = impact * self.policy.restitution;
            } else {
                s.vertical_velocity = 0.0;
                s.is_falling = false;
            }
        }
    }

    /// Move the ground contact point, e.g. after a mesh rebuild. A resting
    /// rock snaps to the new rest offset.
    pub fn set_rest_offset(&mut self, rest_offset: f32) {
        self.state.rest_offset = rest_offset;
        if !self.state.is_falling {
            self.state.vertical_offset = rest_offset;
        }
    }

    /// Cancel any bounce and settle at the rest offset.
    pub fn reset(&mut self) {
        self.state.vertical_offset = self.state.rest_offset;
        self.state.vertical_velocity = 0.0;
        self.state.is_falling = false;
    }
}
