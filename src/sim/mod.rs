pub mod dead_end;
pub mod event;
pub mod generator;
pub mod maze;
pub mod navigation;
pub mod session;
pub mod visibility;
