//! Collision-resistant identifiers for sandbox names.

use uuid::Uuid;

/// Generate a short identifier for a sandbox instance.
///
/// UUIDv7 is time-ordered with random tail bits, so identifiers generated in
/// rapid succession within one process never collide, unlike short strings
/// drawn from a small alphabet.
pub(crate) fn next() -> String {
    Uuid::now_v7().simple().to_string()
}
