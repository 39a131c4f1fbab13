//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock board.  All tests run on the host with no real
//! hardware required.

mod mock_hw;
mod mode_cycle_tests;
mod power_tests;
