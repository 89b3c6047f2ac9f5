use serde::{Deserialize, Serialize};

// 广播触发 API
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TriggerResponse {
    pub success: bool,
    pub count: usize,
}
