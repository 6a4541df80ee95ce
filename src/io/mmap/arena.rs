use std::sync::Arc;
use std::{io, mem, os, ptr, slice};

use crate::buffer::Memory;
use crate::device::Handle;
use crate::sys::*;
use crate::v4l2;

/// Manage mapped capture buffers
///
/// All buffers are unmapped in the Drop impl.
/// In case of errors during unmapping, we panic because there is memory corruption going on.
pub struct Arena {
    handle: Arc<Handle>,

    bufs: Vec<(*mut os::raw::c_void, usize)>,
}

impl Arena {
    /// Returns a new buffer manager instance
    ///
    /// You usually do not need to use this directly.
    /// A [`super::Stream`] creates its own arena instance by default.
    ///
    /// # Arguments
    ///
    /// * `handle` - Device handle to get its file descriptor
    pub fn new(handle: Arc<Handle>) -> Self {
        Arena {
            handle,
            bufs: Vec::new(),
        }
    }

    /// Allocate buffers on the device and map them into process memory
    ///
    /// The driver is free to grant fewer (or more) buffers than requested;
    /// the actual number is returned.
    ///
    /// # Arguments
    ///
    /// * `count` - Desired number of buffers
    pub fn allocate(&mut self, count: u32) -> io::Result<u32> {
        let mut v4l2_reqbufs = v4l2_requestbuffers {
            count,
            type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
            memory: Memory::Mmap as u32,
            ..unsafe { mem::zeroed() }
        };
        unsafe {
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_REQBUFS,
                &mut v4l2_reqbufs as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        if v4l2_reqbufs.count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "not enough buffer memory on the device",
            ));
        }

        for index in 0..v4l2_reqbufs.count {
            let mut v4l2_buf = v4l2_buffer {
                index,
                type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
                memory: Memory::Mmap as u32,
                ..unsafe { mem::zeroed() }
            };
            unsafe {
                v4l2::ioctl(
                    self.handle.fd(),
                    v4l2::vidioc::VIDIOC_QUERYBUF,
                    &mut v4l2_buf as *mut _ as *mut std::os::raw::c_void,
                )?;

                let ptr = v4l2::mmap(
                    ptr::null_mut(),
                    v4l2_buf.length as usize,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_SHARED,
                    self.handle.fd(),
                    v4l2_buf.m.offset as libc::off_t,
                )?;

                self.bufs.push((ptr, v4l2_buf.length as usize));
            }
        }

        Ok(v4l2_reqbufs.count)
    }

    /// Unmap all buffers and release them on the device
    pub fn release(&mut self) -> io::Result<()> {
        for buf in &self.bufs {
            unsafe {
                v4l2::munmap(buf.0, buf.1)?;
            }
        }

        // free all buffers by requesting 0
        let mut v4l2_reqbufs = v4l2_requestbuffers {
            count: 0,
            type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
            memory: Memory::Mmap as u32,
            ..unsafe { mem::zeroed() }
        };
        unsafe {
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_REQBUFS,
                &mut v4l2_reqbufs as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        self.bufs.clear();
        Ok(())
    }

    /// Number of mapped buffers
    pub fn len(&self) -> usize {
        self.bufs.len()
    }

    /// Whether any buffers are mapped
    pub fn is_empty(&self) -> bool {
        self.bufs.is_empty()
    }

    /// Returns a view into the mapped region at the specified index
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let &(ptr, len) = self.bufs.get(index)?;
        Some(unsafe { slice::from_raw_parts(ptr as *const u8, len) })
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        if self.bufs.is_empty() {
            return;
        }

        if let Err(e) = self.release() {
            // ENODEV means the fd went stale, most likely because the device
            // was unplugged. There is nothing left to free in that case.
            if e.raw_os_error() != Some(libc::ENODEV) {
                panic!("{:?}", e);
            }
        }
    }
}
