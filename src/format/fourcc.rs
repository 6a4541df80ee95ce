use std::{fmt, str};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
/// Four character code representing a pixelformat
pub struct FourCC {
    pub repr: [u8; 4],
}

impl FourCC {
    /// YUYV 4:2:2 packed
    pub const YUYV: FourCC = FourCC::new(b"YUYV");
    /// 24-bit RGB, one byte per channel
    pub const RGB3: FourCC = FourCC::new(b"RGB3");
    /// Motion JPEG
    pub const MJPG: FourCC = FourCC::new(b"MJPG");
    /// 8-bit greyscale
    pub const GREY: FourCC = FourCC::new(b"GREY");

    /// Returns a pixelformat as four character code
    ///
    /// # Arguments
    ///
    /// * `repr` - Four characters as raw bytes
    ///
    /// # Example
    ///
    /// ```
    /// use vcap::format::FourCC;
    /// let fourcc = FourCC::new(b"YUYV");
    /// ```
    pub const fn new(repr: &[u8; 4]) -> FourCC {
        FourCC { repr: *repr }
    }

    /// Returns the string representation of a four character code
    pub fn str(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(&self.repr)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Ok(string) = str::from_utf8(&self.repr) {
            write!(f, "{}", string)?;
        }
        Ok(())
    }
}

impl From<u32> for FourCC {
    fn from(code: u32) -> Self {
        FourCC::new(&code.to_le_bytes())
    }
}

impl From<FourCC> for u32 {
    fn from(fourcc: FourCC) -> Self {
        Self::from_le_bytes(fourcc.repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let fourcc = FourCC::YUYV;
        assert_eq!(FourCC::from(u32::from(fourcc)), fourcc);
        // little-endian byte order, as the kernel defines v4l2_fourcc()
        assert_eq!(u32::from(FourCC::YUYV), 0x5659_5559);
    }

    #[test]
    fn display() {
        assert_eq!(FourCC::MJPG.to_string(), "MJPG");
    }
}
