pub mod connection;
pub mod navigation;

pub use connection::connect_to_browser_and_page;
pub use navigation::{Navigate, PageNavigator};
