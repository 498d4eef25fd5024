pub mod loader;

pub use loader::{load_dataset, DataPaths, Dataset, LoadError};
