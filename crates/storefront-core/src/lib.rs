pub mod bundle;
pub mod config;
pub mod error;
pub mod inject;
pub mod preview;
pub mod site;
pub mod template;

pub use bundle::{inline_assets, Bundle};
pub use error::{Result, StorefrontError};
pub use inject::{inject, Injection};
pub use preview::{write_page, Preview, RenderedPage};
pub use site::Site;
