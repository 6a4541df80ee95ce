use vcap::context;
use vcap::Device;

fn main() {
    for node in context::enum_devices() {
        println!("{}", node.path().display());
        if let Some(name) = node.name() {
            println!("    name : {}", name);
        }

        let caps = Device::with_path(node.path()).and_then(|dev| dev.query_caps());
        match caps {
            Ok(caps) => {
                println!("    driver   : {}", caps.driver);
                println!("    card     : {}", caps.card);
                println!("    bus info : {}", caps.bus);
            }
            Err(e) => println!("    {}", e),
        }
    }
}
