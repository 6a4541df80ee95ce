use std::convert::TryInto;
use std::sync::Arc;
use std::time::Duration;
use std::{io, mem};

use crate::buffer::{Memory, Metadata};
use crate::device::{Device, Handle};
use crate::io::mmap::Arena;
use crate::io::traits::{CaptureStream, Stream as StreamTrait};
use crate::sys::*;
use crate::v4l2;

/// Stream of memory mapped buffers
///
/// An arena instance is used internally for buffer handling.
pub struct Stream {
    handle: Arc<Handle>,
    arena: Arena,
    arena_index: usize,
    meta: Vec<Metadata>,

    active: bool,
    timeout: Option<i32>,
}

impl Stream {
    /// Returns a stream for frame capturing
    ///
    /// Four buffers are requested by default, which is enough to keep the
    /// driver busy while one frame is being consumed.
    ///
    /// # Arguments
    ///
    /// * `dev` - Capture device to stream from
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vcap::Device;
    /// use vcap::io::mmap::Stream;
    ///
    /// let dev = Device::new(0);
    /// if let Ok(dev) = dev {
    ///     let stream = Stream::new(&dev);
    /// }
    /// ```
    pub fn new(dev: &Device) -> io::Result<Self> {
        Stream::with_buffers(dev, 4)
    }

    /// Returns a stream with the desired number of buffers
    ///
    /// # Arguments
    ///
    /// * `dev` - Capture device to stream from
    /// * `buf_count` - Desired number of buffers
    pub fn with_buffers(dev: &Device, buf_count: u32) -> io::Result<Self> {
        let mut arena = Arena::new(dev.handle());
        let count = arena.allocate(buf_count)?;

        Ok(Stream {
            handle: dev.handle(),
            arena,
            arena_index: 0,
            meta: vec![Metadata::default(); count as usize],
            active: false,
            timeout: None,
        })
    }

    /// Sets a timeout for dequeueing a frame
    pub fn set_timeout(&mut self, duration: Duration) {
        self.timeout = Some(duration.as_millis().try_into().unwrap_or(i32::MAX));
    }

    /// Clears the dequeue timeout, waits will block indefinitely again
    pub fn clear_timeout(&mut self) {
        self.timeout = None;
    }

    fn buffer_desc(&self) -> v4l2_buffer {
        v4l2_buffer {
            type_: v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32,
            memory: Memory::Mmap as u32,
            ..unsafe { mem::zeroed() }
        }
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        // This may fail if the device was unplugged in the meantime, in which
        // case there is nothing left to clean up anyway.
        let _ = self.stop();
    }
}

impl StreamTrait for Stream {
    type Item = [u8];

    fn start(&mut self) -> io::Result<()> {
        unsafe {
            let mut typ = v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32;
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_STREAMON,
                &mut typ as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        unsafe {
            let mut typ = v4l2_buf_type_V4L2_BUF_TYPE_VIDEO_CAPTURE as u32;
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_STREAMOFF,
                &mut typ as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        self.active = false;
        Ok(())
    }
}

impl<'a> CaptureStream<'a> for Stream {
    fn queue(&mut self, index: usize) -> io::Result<()> {
        let mut v4l2_buf = v4l2_buffer {
            index: index as u32,
            ..self.buffer_desc()
        };
        unsafe {
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_QBUF,
                &mut v4l2_buf as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        Ok(())
    }

    fn dequeue(&mut self) -> io::Result<usize> {
        // The device is opened in non-blocking mode, so wait for a filled
        // buffer first. Zero ready fds can only happen on a timeout, which is
        // propagated to the caller.
        if self.handle.poll(libc::POLLIN, self.timeout.unwrap_or(-1))? == 0 {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "VIDIOC_DQBUF"));
        }

        let mut v4l2_buf = self.buffer_desc();
        unsafe {
            v4l2::ioctl(
                self.handle.fd(),
                v4l2::vidioc::VIDIOC_DQBUF,
                &mut v4l2_buf as *mut _ as *mut std::os::raw::c_void,
            )?;
        }

        let index = v4l2_buf.index as usize;
        self.arena_index = index;
        self.meta[index] = Metadata {
            bytesused: v4l2_buf.bytesused,
            flags: v4l2_buf.flags.into(),
            timestamp: v4l2_buf.timestamp.into(),
            sequence: v4l2_buf.sequence,
        };

        Ok(index)
    }

    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.arena.get(index)
    }

    fn get_meta(&self, index: usize) -> Option<&Metadata> {
        self.meta.get(index)
    }

    fn next(&'a mut self) -> io::Result<(&Self::Item, &Metadata)> {
        if !self.active {
            // Enqueue all buffers once on stream start
            for index in 0..self.arena.len() {
                CaptureStream::queue(self, index)?;
            }

            self.start()?;
        } else {
            // Requeue the buffer the caller is done with
            CaptureStream::queue(self, self.arena_index)?;
        }

        let index = CaptureStream::dequeue(self)?;

        // The index is handed to us by the driver, so it is valid by definition
        let item = self.arena.get(index).expect("invalid buffer index");
        Ok((item, &self.meta[index]))
    }
}
