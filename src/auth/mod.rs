pub mod registry;

pub use registry::{RegistryAuthenticator, RegistryCredentials};
