/// Stamping transformed stencils onto canvases
pub mod compositor;
/// Placement records and deterministic replay
pub mod history;
/// Greedy stochastic placement search
pub mod search;
