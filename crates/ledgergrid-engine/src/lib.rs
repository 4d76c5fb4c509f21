//! ledgergrid_engine - Grid data layer (column contract, formatting, subtotals, sorting).

pub mod engine;
