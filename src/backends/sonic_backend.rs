//! Purpose: sonic-rs backend over its DOM `Value`.

use sonic_rs::{JsonContainerTrait, JsonType, JsonValueTrait, Value};

use crate::core::backend::JsonBackend;
use crate::core::error::Error;
use crate::core::stat::Stat;

#[derive(Clone, Copy, Debug, Default)]
pub struct SonicRs;

impl JsonBackend for SonicRs {
    type Document = Value;

    fn name(&self) -> &str {
        "sonic-rs"
    }

    fn parse(&self, text: &[u8]) -> Result<Value, Error> {
        sonic_rs::from_slice(text).map_err(Error::backend)
    }

    fn stringify(&self, doc: &Value) -> Result<Vec<u8>, Error> {
        sonic_rs::to_vec(doc).map_err(Error::backend)
    }

    fn prettify(&self, doc: &Value) -> Result<Vec<u8>, Error> {
        sonic_rs::to_vec_pretty(doc).map_err(Error::backend)
    }

    fn statistics(&self, doc: &Value) -> Stat {
        let mut stat = Stat::default();
        walk(doc, &mut stat);
        stat
    }
}

fn walk(value: &Value, stat: &mut Stat) {
    match value.get_type() {
        JsonType::Null => stat.record_null(),
        JsonType::Boolean => stat.record_bool(value.as_bool().unwrap_or(false)),
        JsonType::Number => stat.record_number(),
        JsonType::String => stat.record_string(value.as_str().map_or(0, str::len)),
        JsonType::Array => {
            if let Some(items) = value.as_array() {
                stat.record_array(items.len());
                for item in items.iter() {
                    walk(item, stat);
                }
            }
        }
        JsonType::Object => {
            if let Some(members) = value.as_object() {
                stat.record_object(members.len());
                for (_, member) in members.iter() {
                    walk(member, stat);
                }
            }
        }
    }
}
