mod account;
mod job;
mod money;
mod pricing;
mod transaction;

pub use account::*;
pub use job::*;
pub use money::*;
pub use pricing::*;
pub use transaction::*;
