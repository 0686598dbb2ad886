use serde::{Deserialize, Serialize};

use crate::utils::error_codes;

#[derive(Serialize, Deserialize)]
pub struct ApiResult<T: Serialize> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            error_message: None,
            content: Some(data),
        }
    }
}
