// Output naming - Collision-free output path resolution

pub mod naming;

pub use naming::NamingResolver;
