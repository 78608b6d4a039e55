pub mod wall;
pub mod scene;
pub mod observer;

pub use self::{
    wall::*,
    scene::*,
    observer::*,
};
