//! Band statistics and their persisted tables

/// Accumulators and derived per-band statistics
pub mod statistics;
/// Statistics table CSV persistence
pub mod table;
