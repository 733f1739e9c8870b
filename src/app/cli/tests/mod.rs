//! Tests for argument parsing and configuration merging

mod config_tests;
