pub mod cell;
pub mod session;
