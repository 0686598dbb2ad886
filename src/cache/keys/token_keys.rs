/// 访问令牌关联记录键前缀
const ACCESS_PREFIX: &str = "token:access:";

/// 续期令牌关联记录键前缀
const RENEWAL_PREFIX: &str = "token:renewal:";

/// 生成访问令牌关联记录键，值为配对的续期令牌ID
pub fn access_key(unique_id: &str) -> String {
    format!("{}{}", ACCESS_PREFIX, unique_id)
}

/// 生成续期令牌关联记录键，值为令牌所属的主体
pub fn renewal_key(unique_id: &str) -> String {
    format!("{}{}", RENEWAL_PREFIX, unique_id)
}
