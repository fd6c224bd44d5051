pub mod codec;
pub mod packets;
pub mod pool;

pub use codec::*;
pub use packets::*;
pub use pool::*;
