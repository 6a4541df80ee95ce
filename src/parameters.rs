use std::{fmt, mem};

use crate::fraction::Fraction;
use crate::sys::v4l2_captureparm;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// the device honors the timeperframe field
        const TIME_PER_FRAME = 0x1000;
    }
}

impl From<u32> for Capabilities {
    fn from(caps: u32) -> Self {
        Self::from_bits_retain(caps)
    }
}

impl From<Capabilities> for u32 {
    fn from(caps: Capabilities) -> Self {
        caps.bits()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modes: u32 {
        const HIGH_QUALITY = 0x0001;
    }
}

impl From<u32> for Modes {
    fn from(modes: u32) -> Self {
        Self::from_bits_retain(modes)
    }
}

impl From<Modes> for u32 {
    fn from(modes: Modes) -> Self {
        modes.bits()
    }
}

impl fmt::Display for Modes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Copy, Clone)]
/// Capture streaming parameters
pub struct Parameters {
    pub capabilities: Capabilities,
    pub modes: Modes,
    /// time between two frames, the inverse of the frame rate
    pub interval: Fraction,
}

impl Parameters {
    pub fn new(interval: Fraction) -> Self {
        Parameters {
            capabilities: Capabilities::empty(),
            modes: Modes::empty(),
            interval,
        }
    }

    /// Returns parameters requesting the given frame rate
    ///
    /// # Example
    ///
    /// ```
    /// use vcap::parameters::Parameters;
    /// let params = Parameters::with_fps(30);
    /// ```
    pub fn with_fps(fps: u32) -> Self {
        Parameters::new(Fraction::new(1, fps))
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "capabilities : {}", self.capabilities)?;
        writeln!(f, "modes        : {}", self.modes)?;
        writeln!(f, "interval     : {} [s]", self.interval)?;
        Ok(())
    }
}

impl From<v4l2_captureparm> for Parameters {
    fn from(params: v4l2_captureparm) -> Self {
        Parameters {
            capabilities: Capabilities::from(params.capability),
            modes: Modes::from(params.capturemode),
            interval: Fraction::from(params.timeperframe),
        }
    }
}

impl From<Parameters> for v4l2_captureparm {
    fn from(params: Parameters) -> Self {
        v4l2_captureparm {
            capability: params.capabilities.into(),
            capturemode: params.modes.into(),
            timeperframe: params.interval.into(),
            ..unsafe { mem::zeroed() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_interval() {
        let params = Parameters::with_fps(30);
        assert_eq!(params.interval, Fraction::new(1, 30));
    }
}
