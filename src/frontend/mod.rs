pub mod app;
pub mod client;
pub mod storage;
pub mod view;

pub use app::CatalogApp;
pub use client::{ApiClient, ClientError};
pub use storage::{ClientStorage, StoredSession};
pub use view::{CatalogView, CatalogViewModel, MovieDetail};
