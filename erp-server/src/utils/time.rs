//! 时间工具函数
//!
//! 存储层统一使用 `i64` Unix millis 时间戳。

/// 当前 Unix 时间戳 (毫秒)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
