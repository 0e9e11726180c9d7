mod sut_process;

pub use sut_process::SutProcess;
