use serde_json::Value;

use crate::core::backend::JsonBackend;
use crate::core::error::Error;
use crate::core::stat::Stat;

/// `serde_json` with its dynamic `Value` tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeJson;

impl JsonBackend for SerdeJson {
    type Document = Value;

    fn name(&self) -> &str {
        "serde_json"
    }

    fn parse(&self, text: &[u8]) -> Result<Value, Error> {
        serde_json::from_slice(text).map_err(Error::backend)
    }

    fn stringify(&self, doc: &Value) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(doc).map_err(Error::backend)
    }

    fn prettify(&self, doc: &Value) -> Result<Vec<u8>, Error> {
        serde_json::to_vec_pretty(doc).map_err(Error::backend)
    }

    fn statistics(&self, doc: &Value) -> Stat {
        let mut stat = Stat::default();
        walk(doc, &mut stat);
        stat
    }
}

fn walk(value: &Value, stat: &mut Stat) {
    match value {
        Value::Null => stat.record_null(),
        Value::Bool(b) => stat.record_bool(*b),
        Value::Number(_) => stat.record_number(),
        Value::String(s) => stat.record_string(s.len()),
        Value::Array(items) => {
            stat.record_array(items.len());
            for item in items {
                walk(item, stat);
            }
        }
        Value::Object(members) => {
            stat.record_object(members.len());
            for member in members.values() {
                walk(member, stat);
            }
        }
    }
}
