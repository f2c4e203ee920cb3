/// Resolve a key from a nested scope.
pub mod lookup;
/// Render or re-encode a whole document.
pub mod show;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
