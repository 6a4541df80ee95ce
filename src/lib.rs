//! Safe video capture for Linux webcams.
//!
//! This crate wraps the video4linux2 (V4L2) capture API: it opens a device
//! node, negotiates a pixel format and frame rate, maps the kernel's capture
//! buffers into process memory and exchanges them with the driver over the
//! streaming ioctls. Conversion from YUYV to RGB24 is provided for drivers
//! that do not emulate RGB output.
//!
//! Two backends are available via cargo features:
//!
//! * `v4l2` (default): ioctls are issued directly against the kernel.
//! * `libv4l`: all calls are routed through the libv4l2 userspace shim,
//!   which emulates common formats (e.g. RGB24) on top of whatever the
//!   driver actually produces.
//!
//! # Example
//!
//! ```no_run
//! use vcap::prelude::*;
//!
//! fn main() -> std::io::Result<()> {
//!     let dev = Device::new(0)?;
//!     let fmt = dev.set_format(&Format::new(640, 480, FourCC::YUYV))?;
//!     println!("negotiated format:\n{}", fmt);
//!
//!     let mut stream = MmapStream::with_buffers(&dev, 4)?;
//!     let (frame, meta) = stream.next()?;
//!     println!("captured {} of {} bytes (frame #{})", meta.bytesused, frame.len(), meta.sequence);
//!     Ok(())
//! }
//! ```

#[cfg(all(feature = "v4l2", feature = "libv4l"))]
compile_error!("The `v4l2` and `libv4l` backends are mutually exclusive.");

#[cfg(not(any(feature = "v4l2", feature = "libv4l")))]
compile_error!("Either the `v4l2` or the `libv4l` backend must be enabled.");

#[cfg(feature = "libv4l")]
pub use vcap_libv4l_sys as sys;
#[cfg(feature = "v4l2")]
pub use vcap_v4l2_sys as sys;

pub mod v4l2;

pub mod buffer;
pub mod capability;
pub mod context;
pub mod control;
pub mod convert;
pub mod device;
pub mod format;
pub mod fraction;
pub mod io;
pub mod parameters;
pub mod timestamp;

pub use device::Device;
pub use format::{Format, FourCC};
pub use fraction::Fraction;
pub use timestamp::Timestamp;

pub mod prelude {
    pub use crate::buffer;
    pub use crate::device::Device;
    pub use crate::format::{Format, FourCC};
    pub use crate::fraction::Fraction;
    pub use crate::io::mmap::Stream as MmapStream;
    pub use crate::io::traits::{CaptureStream, Stream};
}
