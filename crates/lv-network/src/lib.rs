//! `lv-network` — road network, spatial indexing, and free-flow routing.
//!
//! The network is read-only once built and shared by every indicator module
//! of a run.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, `ModeSet` |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `free_flow_cost` |
//! | [`loader`]  | `load_network_csv` (nodes + links CSV)                      |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_readers};
pub use network::{ModeSet, RoadNetwork, RoadNetworkBuilder};
pub use router::{free_flow_cost, DijkstraRouter, Route, Router};
