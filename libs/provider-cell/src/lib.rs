pub mod directory;

pub use directory::ProviderDirectory;
