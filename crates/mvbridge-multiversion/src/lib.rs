//! Translation between the latest Bedrock protocol and the older revisions
//! it still accepts.
//!
//! Each supported version has a [`VersionAdapter`] that rewrites packets
//! between its own shapes and those of the next newer version. The
//! [`Translator`] chains them so any supported version can reach the latest
//! one and back.

mod adapter;
mod config;
pub mod defaults;
mod packet;
mod pipeline;
pub mod v1_20_40;
pub mod v1_20_60;
pub mod v1_20_80;

#[cfg(test)]
mod testutil;

pub use adapter::{SessionInfo, VersionAdapter};
pub use config::TranslatorConfig;
pub use packet::Packet;
pub use pipeline::{downgrade, upgrade, TranslateError, TranslateResult, Translator};

use mvbridge_mappings::Remapper;
use mvbridge_types::ProtocolVersion;
use std::sync::Arc;

/// Every legacy version an adapter exists for, oldest first.
pub const SUPPORTED_VERSIONS: [ProtocolVersion; 3] = [
    v1_20_40::VERSION,
    v1_20_60::VERSION,
    v1_20_80::VERSION,
];

/// Build the adapter for a legacy protocol number.
pub fn adapter_for(protocol: i32, remapper: Remapper) -> Option<Arc<dyn VersionAdapter>> {
    let adapter: Arc<dyn VersionAdapter> = match protocol {
        p if p == v1_20_40::VERSION.id => Arc::new(v1_20_40::Adapter::new(remapper)),
        p if p == v1_20_60::VERSION.id => Arc::new(v1_20_60::Adapter::new(remapper)),
        p if p == v1_20_80::VERSION.id => Arc::new(v1_20_80::Adapter::new(remapper)),
        _ => return None,
    };
    Some(adapter)
}
