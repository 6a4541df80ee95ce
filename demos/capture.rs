//! Grabs a single picture and stores it as a PPM file.
//!
//! The stream is kept running for a moment before the picture is taken since
//! some cameras need a few frames to get bright enough.

use std::fs::File;
use std::io::Write;
use std::time::{Duration, Instant};

use vcap::convert;
use vcap::prelude::*;

fn main() -> std::io::Result<()> {
    let path = "/dev/video0";
    println!("Using device: {}\n", path);

    let dev = Device::with_path(path)?;
    let fmt = dev.set_format(&Format::new(1280, 720, FourCC::YUYV))?;
    println!("Format in use:\n{}", fmt);

    let mut stream = MmapStream::with_buffers(&dev, 4)?;

    let warmup = Instant::now();
    while warmup.elapsed() < Duration::from_secs(2) {
        stream.next()?;
    }

    let (frame, _) = stream.next()?;
    let rgb = convert::yuyv_to_rgb24(frame);

    let mut file = File::create("frame.ppm")?;
    write!(file, "P6\n{} {}\n255\n", fmt.width, fmt.height)?;
    file.write_all(&rgb)?;

    println!("Saved frame.ppm ({} x {})", fmt.width, fmt.height);
    Ok(())
}
