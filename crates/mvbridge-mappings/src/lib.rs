mod registry;
mod remap;
mod table;

pub use registry::CanonicalRegistry;
pub use remap::Remapper;
pub use table::{BlockEntry, ItemEntry, MappingData, MappingError, MappingResult, MappingTable};
