//! Test modules for the relay
//!
//! Every module drives a `ProducerWrapper<char>` against the recording fakes
//! in `helpers`.

mod helpers;
