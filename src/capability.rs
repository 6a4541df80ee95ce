use std::fmt;

use crate::sys::v4l2_capability;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[allow(clippy::unreadable_literal)]
    pub struct Flags: u32 {
        const VIDEO_CAPTURE         = 0x00000001;
        const VIDEO_OUTPUT          = 0x00000002;
        const VIDEO_OVERLAY         = 0x00000004;
        const VIDEO_CAPTURE_MPLANE  = 0x00001000;
        const VIDEO_OUTPUT_MPLANE   = 0x00002000;
        const VIDEO_M2M_MPLANE      = 0x00004000;
        const VIDEO_M2M             = 0x00008000;
        const AUDIO                 = 0x00020000;
        const EXT_PIX_FORMAT        = 0x00200000;
        const META_CAPTURE          = 0x00800000;
        const READ_WRITE            = 0x01000000;
        const STREAMING             = 0x04000000;
        const META_OUTPUT           = 0x08000000;
        const TOUCH                 = 0x10000000;
        const IO_MC                 = 0x20000000;
        const DEVICE_CAPS           = 0x80000000;
    }
}

impl From<u32> for Flags {
    fn from(flags: u32) -> Self {
        Self::from_bits_retain(flags)
    }
}

impl From<Flags> for u32 {
    fn from(flags: Flags) -> Self {
        flags.bits()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Device capabilities as reported by VIDIOC_QUERYCAP
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Driver name, e.g. uvcvideo for usb video class devices
    pub driver: String,
    /// Card name
    pub card: String,
    /// Bus name, e.g. USB or PCI
    pub bus: String,
    /// Version number MAJOR.MINOR.PATCH
    pub version: (u8, u8, u8),

    /// Capabilities of the physical device as a whole
    pub capabilities: Flags,
    /// Capabilities of the opened node, only valid if
    /// [`Flags::DEVICE_CAPS`] is set in `capabilities`
    pub device_caps: Flags,
}

impl From<v4l2_capability> for Capabilities {
    fn from(cap: v4l2_capability) -> Self {
        Capabilities {
            driver: String::from_utf8_lossy(&cap.driver)
                .trim_matches(char::from(0))
                .to_string(),
            card: String::from_utf8_lossy(&cap.card)
                .trim_matches(char::from(0))
                .to_string(),
            bus: String::from_utf8_lossy(&cap.bus_info)
                .trim_matches(char::from(0))
                .to_string(),
            version: (
                ((cap.version >> 16) & 0xff) as u8,
                ((cap.version >> 8) & 0xff) as u8,
                (cap.version & 0xff) as u8,
            ),
            capabilities: Flags::from(cap.capabilities),
            device_caps: Flags::from(cap.device_caps),
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Driver       : {}", self.driver)?;
        writeln!(f, "Card         : {}", self.card)?;
        writeln!(f, "Bus          : {}", self.bus)?;
        writeln!(
            f,
            "Version      : {}.{}.{}",
            self.version.0, self.version.1, self.version.2
        )?;
        writeln!(f, "Capabilities : {}", self.capabilities)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw() {
        let mut raw: v4l2_capability = unsafe { std::mem::zeroed() };
        raw.driver[..8].copy_from_slice(b"uvcvideo");
        raw.card[..10].copy_from_slice(b"Acme Cam 9");
        raw.version = (5 << 16) | (10 << 8) | 3;
        raw.capabilities = 0x8520_0001;

        let caps = Capabilities::from(raw);
        assert_eq!(caps.driver, "uvcvideo");
        assert_eq!(caps.card, "Acme Cam 9");
        assert_eq!(caps.version, (5, 10, 3));
        assert!(caps.capabilities.contains(Flags::VIDEO_CAPTURE));
        assert!(caps.capabilities.contains(Flags::STREAMING));
        assert!(!caps.capabilities.contains(Flags::VIDEO_OUTPUT));
    }
}
