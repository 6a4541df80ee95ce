use std::convert::TryFrom;
use std::{fmt, mem};

use crate::sys::v4l2_pix_format;

pub mod colorspace;
pub use colorspace::Colorspace;

pub mod description;
pub use description::Description;

pub mod field;
pub use field::FieldOrder;

pub mod fourcc;
pub use fourcc::FourCC;

#[derive(Debug, Copy, Clone)]
/// Capture image format (single-planar)
pub struct Format {
    /// width in pixels
    pub width: u32,
    /// height in pixels
    pub height: u32,
    /// pixelformat code
    pub fourcc: FourCC,
    /// field order for interlacing
    pub field_order: FieldOrder,

    /// bytes per line
    pub stride: u32,
    /// maximum number of bytes required to store an image
    pub size: u32,

    /// supplements the pixelformat (fourcc) information
    pub colorspace: Colorspace,
}

impl Format {
    /// Returns a capture format
    ///
    /// Stride, size and colorspace are left for the driver to fill in during
    /// negotiation.
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `fourcc` - Four character code (pixelformat)
    ///
    /// # Example
    ///
    /// ```
    /// use vcap::{Format, FourCC};
    /// let fmt = Format::new(640, 480, FourCC::YUYV);
    /// ```
    pub const fn new(width: u32, height: u32, fourcc: FourCC) -> Self {
        Format {
            width,
            height,
            fourcc,
            field_order: FieldOrder::Any,
            stride: 0,
            size: 0,
            colorspace: Colorspace::Default,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "width      : {}", self.width)?;
        writeln!(f, "height     : {}", self.height)?;
        writeln!(f, "fourcc     : {}", self.fourcc)?;
        writeln!(f, "field      : {}", self.field_order)?;
        writeln!(f, "stride     : {}", self.stride)?;
        writeln!(f, "size       : {}", self.size)?;
        writeln!(f, "colorspace : {}", self.colorspace)?;
        Ok(())
    }
}

impl From<v4l2_pix_format> for Format {
    fn from(fmt: v4l2_pix_format) -> Self {
        Format {
            width: fmt.width,
            height: fmt.height,
            fourcc: FourCC::from(fmt.pixelformat),
            // drivers may report values newer than this crate knows about
            field_order: FieldOrder::try_from(fmt.field).unwrap_or(FieldOrder::Any),
            stride: fmt.bytesperline,
            size: fmt.sizeimage,
            colorspace: Colorspace::try_from(fmt.colorspace).unwrap_or(Colorspace::Default),
        }
    }
}

impl From<Format> for v4l2_pix_format {
    fn from(format: Format) -> Self {
        v4l2_pix_format {
            width: format.width,
            height: format.height,
            pixelformat: format.fourcc.into(),
            field: format.field_order as u32,
            bytesperline: format.stride,
            sizeimage: format.size,
            colorspace: format.colorspace as u32,
            ..unsafe { mem::zeroed() }
        }
    }
}
