mod supervisor;
mod template;

pub use supervisor::ProcessSupervisor;
pub use template::{SutConfigTemplate, AUTOGENERATED_HEADER};
