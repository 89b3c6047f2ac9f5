pub mod button_app;

pub use button_app::*;
