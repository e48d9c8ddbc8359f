pub mod event;
pub mod game;
pub mod scheduler;
pub mod spawn;
pub mod steer;
pub mod step;
pub mod world;
