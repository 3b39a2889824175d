// ==============================================================================
// lib.rs - Genemap Processor Library
// ==============================================================================
// Description: Library interface for genemap processor modules
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

pub mod models;
pub mod output;
pub mod parsers;
pub mod processor;
pub mod validator;
