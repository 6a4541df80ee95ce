//! Captures an MJPG video for ten seconds and stores it as video.mjpg.

use std::fs::File;
use std::io::Write;
use std::time::{Duration, Instant};

use vcap::prelude::*;

fn main() -> std::io::Result<()> {
    let path = "/dev/video0";
    println!("Using device: {}\n", path);

    let dev = Device::with_path(path)?;
    let fmt = dev.set_format(&Format::new(1280, 720, FourCC::MJPG))?;
    let params = dev.set_fps(30)?;
    println!("Format in use:\n{}", fmt);
    println!("Parameters in use:\n{}", params);

    let mut stream = MmapStream::with_buffers(&dev, 4)?;

    let mut file = File::create("video.mjpg")?;
    let mut frames = 0u32;
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(10) {
        let (frame, meta) = stream.next()?;
        file.write_all(&frame[..meta.bytesused as usize])?;
        frames += 1;
    }

    println!(
        "Saved video.mjpg ({} frames, {:.1} fps)",
        frames,
        f64::from(frames) / start.elapsed().as_secs_f64()
    );
    Ok(())
}
