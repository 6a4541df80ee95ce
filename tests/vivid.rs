//! Integration tests against the vivid virtual capture driver.
//!
//! These tests require:
//! - The `integration` feature flag: `cargo test --features integration`
//! - The vivid kernel module: `modprobe vivid`
//! - Access to /dev/video* devices (may require the video group)
//!
//! They are expected to fail, not silently skip, when vivid is missing.

#![cfg(feature = "integration")]

use std::time::Duration;

use serial_test::serial;

use vcap::context;
use vcap::device::Node;
use vcap::prelude::*;

/// Find all vivid capture nodes via their sysfs names, without opening
/// unrelated (real) cameras.
fn find_vivid_nodes() -> Vec<Node> {
    context::enum_devices()
        .into_iter()
        .filter(|node| {
            node.name()
                .map(|name| name.to_lowercase().contains("vivid"))
                .unwrap_or(false)
        })
        .filter(|node| Device::with_path(node.path()).is_ok())
        .collect()
}

macro_rules! require_vivid {
    () => {
        match find_vivid_nodes().into_iter().next() {
            Some(node) => node,
            None => panic!(
                "vivid virtual camera not available.\n\
                 Load it with: modprobe vivid\n\
                 Or run unit tests only: cargo test --lib"
            ),
        }
    };
}

#[test]
#[serial]
fn open_and_query_caps() {
    let node = require_vivid!();

    let dev = Device::with_path(node.path()).expect("failed to open vivid device");
    let caps = dev.query_caps().expect("failed to query capabilities");

    assert!(caps.driver.contains("vivid"), "expected the vivid driver");
    assert!(caps
        .capabilities
        .contains(vcap::capability::Flags::VIDEO_CAPTURE | vcap::capability::Flags::STREAMING));
}

#[test]
#[serial]
fn enumerate_formats() {
    let node = require_vivid!();

    let dev = Device::with_path(node.path()).expect("failed to open vivid device");
    let formats = dev.enum_formats().expect("failed to enumerate formats");

    assert!(!formats.is_empty());
    assert!(
        formats.iter().any(|desc| desc.fourcc == FourCC::YUYV),
        "vivid always offers YUYV"
    );
}

#[test]
#[serial]
fn negotiate_format() {
    let node = require_vivid!();

    let dev = Device::with_path(node.path()).expect("failed to open vivid device");
    let fmt = dev
        .set_format(&Format::new(640, 480, FourCC::YUYV))
        .expect("failed to set format");

    assert_eq!(fmt.fourcc, FourCC::YUYV);
    assert!(fmt.width > 0 && fmt.height > 0);
    assert!(fmt.size >= fmt.width * fmt.height * 2, "YUYV is 2 bytes/pixel");

    // the negotiated format must be what a subsequent get reports
    let current = dev.format().expect("failed to get format");
    assert_eq!(current.width, fmt.width);
    assert_eq!(current.height, fmt.height);
    assert_eq!(current.fourcc, fmt.fourcc);
}

#[test]
#[serial]
fn set_frame_rate() {
    let node = require_vivid!();

    let dev = Device::with_path(node.path()).expect("failed to open vivid device");
    let params = dev.set_fps(30).expect("failed to set frame rate");

    assert!(params
        .capabilities
        .contains(vcap::parameters::Capabilities::TIME_PER_FRAME));
    assert!(params.interval.denominator > 0);
}

#[test]
#[serial]
fn stream_frames() {
    let node = require_vivid!();

    let dev = Device::with_path(node.path()).expect("failed to open vivid device");
    dev.set_format(&Format::new(640, 480, FourCC::YUYV))
        .expect("failed to set format");

    let mut stream = MmapStream::with_buffers(&dev, 4).expect("failed to create stream");
    stream.set_timeout(Duration::from_secs(5));

    let mut last_sequence = None;
    for _ in 0..4 {
        let (frame, meta) = stream.next().expect("failed to capture frame");
        assert!(!frame.is_empty());
        assert!(meta.bytesused > 0);

        if let Some(last) = last_sequence {
            assert!(meta.sequence > last, "sequence numbers must increase");
        }
        last_sequence = Some(meta.sequence);
    }
}

#[test]
#[serial]
fn control_roundtrip() {
    let node = require_vivid!();

    let dev = Device::with_path(node.path()).expect("failed to open vivid device");
    let controls = dev.query_controls().expect("failed to query controls");
    assert!(!controls.is_empty());

    // vivid implements the user-class brightness control
    let brightness = controls
        .iter()
        .find(|desc| desc.id == u32::from(vcap::control::Id::Brightness))
        .expect("vivid should expose brightness");

    let value = dev
        .control(vcap::control::Id::Brightness)
        .expect("failed to get brightness");
    assert!(value >= brightness.minimum && value <= brightness.maximum);

    dev.set_control(vcap::control::Id::Brightness, brightness.default)
        .expect("failed to set brightness");
    let value = dev
        .control(vcap::control::Id::Brightness)
        .expect("failed to get brightness");
    assert_eq!(value, brightness.default);
}
