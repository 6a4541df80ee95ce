use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io, mem};

use crate::capability::Capabilities;
use crate::control;
use crate::format::{self, Format};
use crate::parameters::Parameters;
use crate::sys::*;
use crate::v4l2;

/// Owns the device file descriptor.
///
/// Shared between a [`Device`] and the streams created from it so the node
/// stays open as long as anything still uses it.
pub struct Handle {
    fd: std::os::raw::c_int,
}

impl Handle {
    fn new(fd: std::os::raw::c_int) -> Self {
        Handle { fd }
    }

    /// Returns the raw file descriptor
    pub fn fd(&self) -> std::os::raw::c_int {
        self.fd
    }

    /// Waits for the fd to become ready, -1 blocks indefinitely
    pub(crate) fn poll(
        &self,
        events: std::os::raw::c_short,
        timeout: std::os::raw::c_int,
    ) -> io::Result<i32> {
        let mut fds = [libc::pollfd {
            fd: self.fd,
            events,
            revents: 0,
        }];

        let ret = unsafe { libc::poll(fds.as_mut_ptr(), 1, timeout) };
        if ret == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(ret)
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        v4l2::close(self.fd).unwrap();
    }
}

/// A video4linux capture device
pub struct Device {
    /// Raw handle
    handle: Arc<Handle>,
}

impl Device {
    /// Returns a capture device by index
    ///
    /// Devices are usually enumerated by the system.
    /// An index of zero thus represents the first device the system got to know about.
    ///
    /// # Arguments
    ///
    /// * `index` - Index (0: first, 1: second, ..)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vcap::Device;
    /// let dev = Device::new(0);
    /// ```
    pub fn new(index: usize) -> io::Result<Self> {
        Self::with_path(format!("{}{}", "/dev/video", index))
    }

    /// Returns a capture device by path
    ///
    /// Linux device nodes are usually found in /dev/videoX.
    ///
    /// # Arguments
    ///
    /// * `path` - Node path (e.g. "/dev/video0")
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vcap::Device;
    /// let dev = Device::with_path("/dev/video0");
    /// ```
    pub fn with_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        // Readiness is handled by polling before dequeueing, so the node is
        // opened in non-blocking mode.
        let fd = v4l2::open(path, libc::O_RDWR | libc::O_NONBLOCK)?;

        Ok(Device {
            handle: Arc::new(Handle::new(fd)),
        })
    }

    /// Returns the raw device handle
    pub fn handle(&self) -> Arc<Handle> {
        self.handle.clone()
    }

    /// Query for device capabilities
    ///
    /// This returns video4linux framework defined information such as card, driver, etc.
    pub fn query_caps(&self) -> io::Result<Capabilities> {
        unsafe {
            let mut v4l2_caps: v4l2_capability = mem::zeroed();
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_QUERYCAP,
                &mut v4l2_caps as *mut _ as *mut std::os::raw::c_void,
            )?;

            Ok(Capabilities::from(v4l2_caps))
        }
    }

    /// Returns the pixelformats the device supports for capturing
    pub fn enum_formats(&self) -> io::Result<Vec<format::Description>> {
        let mut formats = Vec::new();

        loop {
            unsafe {
                let mut v4l2_fmtdesc = v4l2_fmtdesc {
                    index: formats.len() as u32,
                    type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
                    ..mem::zeroed()
                };
                match v4l2::ioctl(
                    self.handle.fd(),
                    v4l2::vidioc::VIDIOC_ENUM_FMT,
                    &mut v4l2_fmtdesc as *mut _ as *mut std::os::raw::c_void,
                ) {
                    Ok(()) => formats.push(format::Description::from(v4l2_fmtdesc)),
                    Err(e) => {
                        // EINVAL denotes the end of the enumeration
                        if formats.is_empty() || e.kind() != io::ErrorKind::InvalidInput {
                            return Err(e);
                        }
                        break;
                    }
                }
            }
        }

        Ok(formats)
    }

    /// Returns the format currently in use
    pub fn format(&self) -> io::Result<Format> {
        unsafe {
            let mut v4l2_fmt = v4l2_format {
                type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
                ..mem::zeroed()
            };
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_G_FMT,
                &mut v4l2_fmt as *mut _ as *mut std::os::raw::c_void,
            )?;

            Ok(Format::from(v4l2_fmt.fmt.pix))
        }
    }

    /// Request a new format
    ///
    /// The driver is free to adjust the request, e.g. to the nearest
    /// resolution it supports; the format actually in effect is returned.
    ///
    /// # Arguments
    ///
    /// * `fmt` - Desired format
    pub fn set_format(&self, fmt: &Format) -> io::Result<Format> {
        unsafe {
            let mut v4l2_fmt = v4l2_format {
                type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
                fmt: v4l2_format__bindgen_ty_1 { pix: (*fmt).into() },
            };
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_S_FMT,
                &mut v4l2_fmt as *mut _ as *mut std::os::raw::c_void,
            )?;

            Ok(Format::from(v4l2_fmt.fmt.pix))
        }
    }

    /// Returns the streaming parameters currently in use
    pub fn params(&self) -> io::Result<Parameters> {
        unsafe {
            let mut v4l2_params = v4l2_streamparm {
                type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
                ..mem::zeroed()
            };
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_G_PARM,
                &mut v4l2_params as *mut _ as *mut std::os::raw::c_void,
            )?;

            Ok(Parameters::from(v4l2_params.parm.capture))
        }
    }

    /// Request new streaming parameters
    ///
    /// As with formats, the driver may adjust the request and the parameters
    /// actually in effect are returned.
    ///
    /// # Arguments
    ///
    /// * `params` - Desired parameters
    pub fn set_params(&self, params: &Parameters) -> io::Result<Parameters> {
        unsafe {
            let mut v4l2_params = v4l2_streamparm {
                type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
                parm: v4l2_streamparm__bindgen_ty_1 {
                    capture: (*params).into(),
                },
            };
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_S_PARM,
                &mut v4l2_params as *mut _ as *mut std::os::raw::c_void,
            )?;

            Ok(Parameters::from(v4l2_params.parm.capture))
        }
    }

    /// Request a new frame rate
    ///
    /// # Arguments
    ///
    /// * `fps` - Frames per second
    pub fn set_fps(&self, fps: u32) -> io::Result<Parameters> {
        self.set_params(&Parameters::with_fps(fps))
    }

    /// Query for device controls
    ///
    /// This returns the supported controls for a device such as gain, focus, white balance, etc.
    pub fn query_controls(&self) -> io::Result<Vec<control::Description>> {
        let mut controls = Vec::new();
        unsafe {
            let mut v4l2_ctrl: v4l2_queryctrl = mem::zeroed();

            loop {
                v4l2_ctrl.id |= V4L2_CTRL_FLAG_NEXT_CTRL;
                match v4l2::ioctl(
                    self.handle.fd(),
                    v4l2::vidioc::VIDIOC_QUERYCTRL,
                    &mut v4l2_ctrl as *mut _ as *mut std::os::raw::c_void,
                ) {
                    Ok(()) => {
                        let mut desc = control::Description::from(v4l2_ctrl);

                        // if this is a menu control, enumerate its items
                        if desc.typ == control::Type::Menu
                            || desc.typ == control::Type::IntegerMenu
                        {
                            let mut items = Vec::new();

                            let mut v4l2_menu: v4l2_querymenu = mem::zeroed();
                            v4l2_menu.id = v4l2_ctrl.id;

                            for i in (v4l2_ctrl.minimum..=v4l2_ctrl.maximum)
                                .step_by(v4l2_ctrl.step.max(1) as usize)
                            {
                                v4l2_menu.index = i as u32;
                                let res = v4l2::ioctl(
                                    self.handle.fd(),
                                    v4l2::vidioc::VIDIOC_QUERYMENU,
                                    &mut v4l2_menu as *mut _ as *mut std::os::raw::c_void,
                                );

                                // Drivers are allowed to reject indices between minimum and
                                // maximum for items they do not support, e.g. the Logitech
                                // C920 does this. Skip the offending index.
                                if res.is_err() {
                                    continue;
                                }

                                if let Ok(item) =
                                    control::MenuItem::try_from((desc.typ, v4l2_menu))
                                {
                                    items.push((v4l2_menu.index, item));
                                }
                            }

                            desc.items = Some(items);
                        }

                        controls.push(desc);
                    }
                    Err(e) => {
                        // EINVAL denotes the end of the enumeration
                        if controls.is_empty() || e.kind() != io::ErrorKind::InvalidInput {
                            return Err(e);
                        }
                        break;
                    }
                }
            }
        }

        Ok(controls)
    }

    /// Returns the current value of a control
    ///
    /// # Arguments
    ///
    /// * `id` - Control identifier, e.g. [`control::Id::ExposureAbsolute`]
    pub fn control<I: Into<u32>>(&self, id: I) -> io::Result<i32> {
        let mut v4l2_ctrl = v4l2_control {
            id: id.into(),
            value: 0,
        };
        unsafe {
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_G_CTRL,
                &mut v4l2_ctrl as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        Ok(v4l2_ctrl.value)
    }

    /// Sets the value of a control
    ///
    /// Boolean controls take 0 and 1.
    /// The driver may clamp the value to the advertised range.
    ///
    /// # Arguments
    ///
    /// * `id` - Control identifier, e.g. [`control::Id::AutoWhiteBalance`]
    /// * `value` - New value
    pub fn set_control<I: Into<u32>>(&self, id: I, value: i32) -> io::Result<()> {
        let mut v4l2_ctrl = v4l2_control {
            id: id.into(),
            value,
        };
        unsafe {
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_S_CTRL,
                &mut v4l2_ctrl as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        Ok(())
    }
}

/// A device node, not necessarily opened
pub struct Node {
    path: PathBuf,
}

impl Node {
    /// Returns a node representation
    ///
    /// # Arguments
    ///
    /// * `path` - Node path (usually a character device)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Node {
            path: PathBuf::from(path.as_ref()),
        }
    }

    /// Returns the absolute path of the device node
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the index of the device node
    pub fn index(&self) -> Option<usize> {
        let file_name = self.path.file_name()?.to_str()?;
        let digits = file_name.trim_start_matches(|c: char| !c.is_ascii_digit());
        digits.parse().ok()
    }

    /// Returns the name of the device by parsing its sysfs entry
    pub fn name(&self) -> Option<String> {
        let index = self.index()?;
        let path = format!("{}{}{}", "/sys/class/video4linux/video", index, "/name");
        let name = fs::read_to_string(path).ok()?;
        Some(name.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_index() {
        assert_eq!(Node::new("/dev/video0").index(), Some(0));
        assert_eq!(Node::new("/dev/video10").index(), Some(10));
        assert_eq!(Node::new("/dev/null").index(), None);
    }
}
