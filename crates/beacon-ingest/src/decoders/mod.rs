//! Per-topic decoders for the recognised event set.

pub mod bpm;
pub mod command;
pub mod crm;
pub mod iam;
pub mod tenant;

use crate::registry::RegistryBuilder;

/// Register every decoder recognised at launch.
pub fn register_defaults(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = tenant::register(builder);
    let builder = bpm::register(builder);
    let builder = crm::register(builder);
    let builder = iam::register(builder);
    command::register(builder)
}
