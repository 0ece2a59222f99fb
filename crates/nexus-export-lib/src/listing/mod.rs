mod pager;
mod types;

pub use pager::{ASSETS_ENDPOINT, AssetPager};
pub use types::{AssetDescriptor, AssetPage};
