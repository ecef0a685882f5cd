//! Purpose: Fixed-shape structural digest of a parsed JSON document.
//! Exports: `Stat`, `StatField`.
//! Role: Round-trip oracle; two parses of equivalent JSON must produce equal digests.
//! Invariants: Counters are compared for equality only; there is no ordering.
//! Invariants: Object keys are not counted as strings and add nothing to `string_length`.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub object_count: u64,
    pub array_count: u64,
    pub number_count: u64,
    pub string_count: u64,
    pub true_count: u64,
    pub false_count: u64,
    pub null_count: u64,
    /// Object key/value pairs.
    pub member_count: u64,
    /// Array items.
    pub element_count: u64,
    /// Cumulative byte length of string values.
    pub string_length: u64,
}

/// One named counter, used when listing or diffing digests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatField {
    pub name: &'static str,
    pub value: u64,
}

impl Stat {
    pub fn fields(&self) -> [StatField; 10] {
        let field = |name, value| StatField { name, value };
        [
            field("objectCount", self.object_count),
            field("arrayCount", self.array_count),
            field("numberCount", self.number_count),
            field("stringCount", self.string_count),
            field("trueCount", self.true_count),
            field("falseCount", self.false_count),
            field("nullCount", self.null_count),
            field("memberCount", self.member_count),
            field("elementCount", self.element_count),
            field("stringLength", self.string_length),
        ]
    }

    /// Counters whose values differ, as `(name, self, other)`.
    pub fn differences(&self, other: &Stat) -> Vec<(&'static str, u64, u64)> {
        self.fields()
            .into_iter()
            .zip(other.fields())
            .filter(|(left, right)| left.value != right.value)
            .map(|(left, right)| (left.name, left.value, right.value))
            .collect()
    }

    pub fn record_object(&mut self, members: usize) {
        self.object_count += 1;
        self.member_count += members as u64;
    }

    pub fn record_array(&mut self, elements: usize) {
        self.array_count += 1;
        self.element_count += elements as u64;
    }

    pub fn record_string(&mut self, byte_len: usize) {
        self.string_count += 1;
        self.string_length += byte_len as u64;
    }

    pub fn record_bool(&mut self, value: bool) {
        if value {
            self.true_count += 1;
        } else {
            self.false_count += 1;
        }
    }

    pub fn record_null(&mut self) {
        self.null_count += 1;
    }

    pub fn record_number(&mut self) {
        self.number_count += 1;
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self.fields() {
            let label = format!("{}:", field.name);
            writeln!(f, "{label:<14}{:>10}", field.value)?;
        }
        Ok(())
    }
}
