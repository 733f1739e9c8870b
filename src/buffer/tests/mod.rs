//! Test modules for the bounded buffer
//!
//! Tests are organised by functional area.
