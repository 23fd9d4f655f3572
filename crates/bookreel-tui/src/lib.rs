pub mod app;
pub mod carousel;
pub mod event;
pub mod images;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
