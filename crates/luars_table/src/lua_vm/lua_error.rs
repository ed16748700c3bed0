use thiserror::Error;

/// Errors raised by table operations and by the call boundary.
///
/// Plain table reads and writes degrade to nil instead of failing; only the
/// cases below surface as errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LuaError {
    /// Storing under a key that cannot be hashed (nil or NaN)
    #[error("table index is {0}")]
    InvalidKey(&'static str),

    /// `next` was resumed with a key the traversal never produced
    #[error("invalid key to 'next'")]
    InvalidNextKey,

    /// A user comparator raised while sorting
    #[error("invalid order function for sorting: {0}")]
    ComparatorFailure(Box<LuaError>),

    /// The default order met two values it cannot compare
    #[error("attempt to compare {0} with {1}")]
    CompareError(&'static str, &'static str),

    /// The call boundary was asked to call a value that is not a function
    #[error("attempt to call a {0} value")]
    NotCallable(&'static str),

    #[error("bad argument #{index} to '{func}' ({message})")]
    BadArgument {
        index: usize,
        func: &'static str,
        message: String,
    },

    #[error("{0}")]
    RuntimeError(String),
}

impl LuaError {
    pub fn runtime(message: impl Into<String>) -> Self {
        LuaError::RuntimeError(message.into())
    }

    pub fn bad_argument(index: usize, func: &'static str, message: impl Into<String>) -> Self {
        LuaError::BadArgument {
            index,
            func,
            message: message.into(),
        }
    }
}
