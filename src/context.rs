use std::fs;

use crate::device::Node;

/// Returns a list of capture device nodes currently known to the system
///
/// # Example
///
/// ```
/// use vcap::context;
/// for node in context::enum_devices() {
///     println!("{}", node.path().display());
/// }
/// ```
pub fn enum_devices() -> Vec<Node> {
    let mut devices = Vec::new();

    if let Ok(entries) = fs::read_dir("/dev") {
        for dentry in entries {
            let dentry = match dentry {
                Ok(dentry) => dentry,
                Err(_) => continue,
            };

            let file_name = dentry.file_name();
            match file_name.to_str() {
                Some(name) if name.starts_with("video") => {
                    devices.push(Node::new(dentry.path()));
                }
                _ => continue,
            }
        }
    }

    devices.sort_by_key(|node| node.path().to_path_buf());
    devices
}
