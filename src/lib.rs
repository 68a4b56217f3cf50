pub mod util;

pub mod model;
pub mod view;
pub mod settings;
