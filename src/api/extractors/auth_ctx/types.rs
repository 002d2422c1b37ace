/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 */

use crate::services::auth::access_jwt::VerifiedAccessToken;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `owner` は token の `sub`。note の可視範囲はこれだけで決まる
/// - `fresh` は検証時点で token が fresh だったか
/// - `jti` は監査/相関用
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCtx {
    pub owner: String,
    pub fresh: bool,
    pub jti: Option<String>,
}

impl From<VerifiedAccessToken> for AuthCtx {
    fn from(token: VerifiedAccessToken) -> Self {
        Self {
            owner: token.owner,
            fresh: token.fresh,
            jti: token.jti,
        }
    }
}
