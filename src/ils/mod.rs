//! Iterated Local Search (ILS) for container stowage.
//!
//! A randomized greedy constructor builds a first placement; the search
//! then repeatedly perturbs the incumbent (remove and reinsert a few
//! containers), improves it with pairwise swaps, and keeps the result
//! only when it places strictly more containers.
//!
//! Every component takes its random generator explicitly, so a run is
//! reproducible from a seed and independent runs can proceed in parallel.
//!
//! # References
//!
//! - Lourenço, H. R., Martin, O. C. & Stützle, T. (2003). "Iterated Local
//!   Search", *Handbook of Metaheuristics*, 320-353.

mod config;
mod construct;
mod local_search;
mod perturb;
mod runner;

pub use config::{IlsConfig, DEFAULT_STALL_LIMIT};
pub use construct::construct;
pub use local_search::{improve, swap_random_pair};
pub use perturb::perturb;
pub use runner::{IlsResult, IlsRunner};
