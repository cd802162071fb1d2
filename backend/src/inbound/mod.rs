//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; future inbound transports would sit
//! alongside it.

pub mod http;
