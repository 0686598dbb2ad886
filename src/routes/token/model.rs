use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub subject: String,
    #[serde(default)]
    pub role: u32,
}

#[derive(Debug, Deserialize)]
pub struct RenewRequest {
    pub renewal_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    pub access_token: String,
    pub renewal_token: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub access_token: String,
    pub renewal_token: String,
    pub subject: String,
}
