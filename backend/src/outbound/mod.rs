//! Outbound adapters implementing domain ports for infrastructure.
//!
//! Adapters are thin translators between domain types and whatever backs
//! them; they contain no governance logic. The memory adapter is the
//! reference store for a single-process deployment. A database-backed
//! adapter would slot in behind the same ports.

pub mod memory;
