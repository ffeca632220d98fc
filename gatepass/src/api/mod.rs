//! HTTP handlers for the gate and administration API.

pub mod accesses;
pub mod events;
pub mod guests;
pub mod scan;
pub mod security;
pub mod staff;
