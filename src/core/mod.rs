// Harness core: backend contract, corpus, verification, timing, and reporting.
pub mod backend;
pub mod bench;
pub mod corpus;
pub mod error;
pub mod registry;
pub mod report;
pub mod stat;
pub mod verify;
