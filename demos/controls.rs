//! Prints all controls of a device, then enables automatic white balance
//! and exposure if the device has them.

use vcap::control::Id;
use vcap::Device;

fn main() -> std::io::Result<()> {
    let path = "/dev/video0";
    println!("Using device: {}\n", path);

    let dev = Device::with_path(path)?;
    for desc in dev.query_controls()? {
        println!("{}", desc);
    }

    if dev.set_control(Id::AutoWhiteBalance, 1).is_ok() {
        println!("auto white balance enabled");
    }

    // 3 selects aperture priority mode on most webcams
    if dev.set_control(Id::ExposureAuto, 3).is_ok() {
        println!("auto exposure enabled");
    }

    Ok(())
}
