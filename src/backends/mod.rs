//! Purpose: JSON libraries shipped with the harness as backends under test.
//! Exports: `SerdeJson`, `SimdJson`, `SonicRs` (feature `sonic`), `register_builtin`.
//! Role: Concrete `JsonBackend` implementations; the harness core never names them.
//! Invariants: Each backend's statistics walk counts values only; object keys are not strings.
//! Invariants: Backend names are stable because reports and artifacts are keyed by them.

mod serde_backend;
mod simd_backend;
#[cfg(feature = "sonic")]
mod sonic_backend;

pub use serde_backend::SerdeJson;
pub use simd_backend::SimdJson;
#[cfg(feature = "sonic")]
pub use sonic_backend::SonicRs;

use crate::core::registry::Registry;

/// Registers every backend compiled into this build.
pub fn register_builtin(registry: &mut Registry) {
    registry.register(SerdeJson).register(SimdJson);
    #[cfg(feature = "sonic")]
    registry.register(SonicRs);
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::stat::Stat;

    pub const SCENARIO: &[u8] = br#"{"a":1,"b":[true,false,null]}"#;

    pub fn scenario_stat() -> Stat {
        Stat {
            object_count: 1,
            array_count: 1,
            number_count: 1,
            string_count: 0,
            true_count: 1,
            false_count: 1,
            null_count: 1,
            member_count: 2,
            element_count: 3,
            string_length: 0,
        }
    }

    pub const STRINGS: &[u8] = r#"{"name":"café","tags":["x","yz"],"n":[1.5,-2,3e2]}"#.as_bytes();

    /// "café" is 5 UTF-8 bytes.
    pub fn strings_stat() -> Stat {
        Stat {
            object_count: 1,
            array_count: 2,
            number_count: 3,
            string_count: 3,
            true_count: 0,
            false_count: 0,
            null_count: 0,
            member_count: 3,
            element_count: 5,
            string_length: 8,
        }
    }
}
