/*
 * Responsibility
 * - API Gateway の TOKEN authorizer イベント
 * - レスポンスは services::authorizer::Decision をそのまま返す
 */
use serde::Deserialize;

/// `{ "type": "TOKEN", "authorizationToken": "Bearer ...", "methodArn": "arn:..." }`
///
/// Every field is optional so that a broken event still yields a DENY instead of a 4xx.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerEvent {
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub authorization_token: Option<String>,
    #[serde(default)]
    pub method_arn: Option<String>,
}
