use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;

/// A restartable source of labeled instances.
pub trait Stream {
    fn header(&self) -> &InstanceHeader;

    fn has_more_instances(&self) -> bool;

    fn next_instance(&mut self) -> Option<Instance>;

    fn restart(&mut self) -> Result<(), Error>;

    fn read_remaining(&mut self) -> Vec<Instance> {
        let mut instances = Vec::new();
        while let Some(instance) = self.next_instance() {
            instances.push(instance);
        }
        instances
    }
}
