mod carousel;
mod popup;
mod search_bar;
mod status_bar;

pub use carousel::{CarouselView, CarouselWidget};
pub use popup::PopupWidget;
pub use search_bar::SearchBarWidget;
pub use status_bar::StatusBarWidget;
