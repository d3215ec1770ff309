pub mod constants;
pub mod creature;
pub mod spatial;
pub mod state;
pub mod systems;
pub mod world;
