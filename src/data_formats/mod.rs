mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct BlogQueryParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "get_default_limit")]
    pub limit: u32,
}

impl BlogQueryParams {
    pub fn page_size(&self) -> u32 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

fn get_default_limit() -> u32 {
    20
}
