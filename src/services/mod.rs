//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own store access and normalization so route handlers stay
//! focused on protocol translation.

pub mod reservations;
