//! Integration tests for auction peers.
//!
//! `loopback` drives two peers wired in-process over mocks; `tcp` runs the
//! same flows through the real RPC server and a redb store.

mod common;
mod integration;
