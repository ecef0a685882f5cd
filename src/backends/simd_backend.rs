//! Purpose: simd-json backend over its owned value tree.
//! Invariants: Input is copied once per parse to satisfy simd-json's mutable-slice API;
//! the copy is part of the measured parse cost.

use simd_json::{OwnedValue, StaticNode};

use crate::core::backend::JsonBackend;
use crate::core::error::Error;
use crate::core::stat::Stat;

#[derive(Clone, Copy, Debug, Default)]
pub struct SimdJson;

impl JsonBackend for SimdJson {
    type Document = OwnedValue;

    fn name(&self) -> &str {
        "simd-json"
    }

    fn parse(&self, text: &[u8]) -> Result<OwnedValue, Error> {
        let mut bytes = text.to_vec();
        simd_json::to_owned_value(&mut bytes).map_err(Error::backend)
    }

    fn stringify(&self, doc: &OwnedValue) -> Result<Vec<u8>, Error> {
        simd_json::serde::to_vec(doc).map_err(Error::backend)
    }

    fn prettify(&self, doc: &OwnedValue) -> Result<Vec<u8>, Error> {
        simd_json::serde::to_vec_pretty(doc).map_err(Error::backend)
    }

    fn statistics(&self, doc: &OwnedValue) -> Stat {
        let mut stat = Stat::default();
        walk(doc, &mut stat);
        stat
    }
}

fn walk(value: &OwnedValue, stat: &mut Stat) {
    match value {
        OwnedValue::Static(StaticNode::Null) => stat.record_null(),
        OwnedValue::Static(StaticNode::Bool(b)) => stat.record_bool(*b),
        OwnedValue::Static(_) => stat.record_number(),
        OwnedValue::String(s) => stat.record_string(s.len()),
        OwnedValue::Array(items) => {
            stat.record_array(items.len());
            for item in items.iter() {
                walk(item, stat);
            }
        }
        OwnedValue::Object(members) => {
            stat.record_object(members.len());
            for member in members.values() {
                walk(member, stat);
            }
        }
    }
}
