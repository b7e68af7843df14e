pub mod builder;
pub mod rank;
pub mod validation;
pub mod visualizer;

pub use builder::{build_graph, GraphNode, ModuleGraph};
pub use rank::RankMap;
pub use validation::find_cycles;
pub use visualizer::{to_dot, DotOptions};
