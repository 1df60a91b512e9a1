//! Accelerometer samples and their magnitude
//!
//! Units are whatever the sensor reports (g or m/s²). The detector only
//! needs them to be consistent between calibration and classification.

/// One 3-axis acceleration reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Acceleration along X
    pub ax: f32,
    /// Acceleration along Y
    pub ay: f32,
    /// Acceleration along Z
    pub az: f32,
}

impl Sample {
    /// Create a sample from its three axes
    pub const fn new(ax: f32, ay: f32, az: f32) -> Self {
        Self { ax, ay, az }
    }

    /// Sample lying entirely on the Z axis, so its magnitude is `|z|`.
    ///
    /// Handy for scripting magnitude sequences.
    pub const fn vertical(az: f32) -> Self {
        Self { ax: 0.0, ay: 0.0, az }
    }

    /// Euclidean norm of the three axes
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.ax * self.ax + self.ay * self.ay + self.az * self.az)
    }

    /// True when every axis is a finite number
    pub fn is_finite(&self) -> bool {
        self.ax.is_finite() && self.ay.is_finite() && self.az.is_finite()
    }
}

impl From<[f32; 3]> for Sample {
    fn from([ax, ay, az]: [f32; 3]) -> Self {
        Self { ax, ay, az }
    }
}

impl From<(f32, f32, f32)> for Sample {
    fn from((ax, ay, az): (f32, f32, f32)) -> Self {
        Self { ax, ay, az }
    }
}
