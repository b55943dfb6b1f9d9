use bytes::Bytes;
use std::sync::LazyLock;

/// Preallocated zero run to scrub fresh blocks without repeated allocations.
pub(crate) static ZEROS: LazyLock<Bytes> = LazyLock::new(|| Bytes::from(vec![0_u8; 64 * 1024]));
