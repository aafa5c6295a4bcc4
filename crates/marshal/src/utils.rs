//! Utility macros shared by the marshalling modules.

/// Returns early with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It is used for contract checks where the caller should receive the error rather
/// than a malformed request.
///
/// # Example
///
/// ```ignore
/// ensure!(!requires_length, MarshalError::LengthRequired);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
