pub mod filter;
pub mod reduce;

pub use filter::CommitFilter;
pub use reduce::reduce;
