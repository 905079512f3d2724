pub mod bitgrid;
pub mod direction;
pub mod lattice;
