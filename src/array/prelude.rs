pub use {
    crate::Error,
    crate::array::{AsyncArray, Direct, Indexer, Length, Yielding},
};
