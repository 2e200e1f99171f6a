use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Tunable constants for one jellyfish. Defaults reproduce the reference shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JellyfishSettings {
    /// Bell height and spine scale.
    pub size: f32,
    /// Height of the mid pin.
    pub y_offset: f32,
    /// Bracing groups per ring. Each ring has `segment_groups * 9` particles.
    pub segment_groups: u32,
    pub ring_count: u32,
    /// Scale applied to the bell profile.
    pub ring_radius: f32,
    pub tail_ring_count: u32,
    /// Linear flare added to the tail's outer target radius.
    pub tail_radius_factor: f32,
    /// Largest radius boost applied at full phase.
    pub radius_offset: f32,
    pub tail_arm_segments: u32,
    pub tail_arm_segment_length: f32,
    pub tentacle_segments: u32,
    pub tentacle_segment_length: f32,
    pub solver_iterations: u32,
    pub preroll_steps: u32,
    pub preroll_dt: f32,
}

impl Default for JellyfishSettings {
    fn default() -> Self {
        Self {
            size: 40.0,
            y_offset: 20.0,
            segment_groups: 4,
            ring_count: 20,
            ring_radius: 15.0,
            tail_ring_count: 15,
            tail_radius_factor: 20.0,
            radius_offset: 15.0,
            tail_arm_segments: 100,
            tail_arm_segment_length: 1.0,
            tentacle_segments: 120,
            tentacle_segment_length: 1.5,
            solver_iterations: 2,
            preroll_steps: 300,
            preroll_dt: 1.0,
        }
    }
}

/// Absolute heights of the five pins on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinHeights {
    pub top: f32,
    pub mid: f32,
    pub bottom: f32,
    pub tail: f32,
    pub tentacle: f32,
}

/// Initial heights of the three spine floaters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloaterHeights {
    pub top: f32,
    pub mid: f32,
    pub bottom: f32,
}

impl JellyfishSettings {
    /// Particles per ring.
    pub fn segments(&self) -> u32 {
        self.segment_groups * 3 * 3
    }

    pub fn pin_heights(&self) -> PinHeights {
        PinHeights {
            top: self.y_offset + self.size,
            mid: self.y_offset,
            bottom: self.y_offset - self.size,
            tail: self.y_offset - self.tail_arm_segments as f32 * self.tail_arm_segment_length,
            tentacle: self.y_offset
                - self.tentacle_segments as f32 * self.tentacle_segment_length * 1.5,
        }
    }

    pub fn floater_heights(&self) -> FloaterHeights {
        FloaterHeights {
            top: self.size * 1.5,
            mid: -self.size * 0.5,
            bottom: -self.size,
        }
    }

    /// Total particles: 8 spine particles plus every bulb and tail ring.
    pub fn particle_count(&self) -> usize {
        let rings = self.ring_count as usize + self.tail_ring_count as usize;
        8 + rings * self.segment_groups as usize * 9
    }

    /// Same as [`particle_count`](Self::particle_count), but `None` instead of
    /// overflowing.
    fn checked_particle_count(&self) -> Option<u64> {
        let rings = u64::from(self.ring_count).checked_add(u64::from(self.tail_ring_count))?;
        let segments = u64::from(self.segment_groups).checked_mul(9)?;
        rings.checked_mul(segments)?.checked_add(8)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.size,
            self.y_offset,
            self.ring_radius,
            self.tail_radius_factor,
            self.radius_offset,
            self.tail_arm_segment_length,
            self.tentacle_segment_length,
            self.preroll_dt,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            bail!("Settings must be finite.");
        }
        if self.size <= 0.0 {
            bail!("size must be positive.");
        }
        if self.ring_radius <= 0.0 {
            bail!("ring_radius must be positive.");
        }
        if self.tail_radius_factor < 0.0 {
            bail!("tail_radius_factor must not be negative.");
        }
        if self.radius_offset < 0.0 {
            bail!("radius_offset must not be negative.");
        }
        if self.segment_groups == 0 {
            bail!("segment_groups must be at least 1.");
        }
        if self.ring_count < 2 {
            bail!("ring_count must be at least 2.");
        }
        if self.tail_ring_count < 1 {
            bail!("tail_ring_count must be at least 1.");
        }
        if self.solver_iterations == 0 {
            bail!("solver_iterations must be greater than zero.");
        }
        if self.preroll_dt < 0.0 {
            bail!("preroll_dt must not be negative.");
        }
        match self.checked_particle_count() {
            Some(count) if count <= u64::from(u32::MAX) => {}
            _ => bail!("Particle count exceeds the u32 index range."),
        }
        Ok(())
    }
}
