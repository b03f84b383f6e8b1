mod errors;
mod facade;

pub use errors::PluginError;
pub use facade::OpenIdPlugin;
