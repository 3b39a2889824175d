// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for OMIM flat-file exports
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

pub mod genemap2;

pub use genemap2::{Genemap2Dataset, Genemap2ParseError, Genemap2Parser};
