use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
//
// 令牌由身份服务签发，本服务只接受 access 类型。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 按配置的有效期签发 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::encode_access_token(
            &config.jwt.secret,
            user_id,
            role,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    pub fn encode_access_token(
        secret: &str,
        user_id: i64,
        role: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 Access Token（使用配置中的密钥）
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_access_token_with(token, &Self::get_secret())
    }

    pub fn verify_access_token_with(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        let claims =
            decode::<Claims>(token, &decoding_key, &validation).map(|data| data.claims)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_roundtrip_access_token() {
        let token =
            JwtUtils::encode_access_token(SECRET, 42, "teacher", chrono::Duration::minutes(5))
                .unwrap();
        let claims = JwtUtils::verify_access_token_with(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.token_type, ACCESS_TOKEN_TYPE);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            JwtUtils::encode_access_token(SECRET, 1, "admin", chrono::Duration::minutes(5))
                .unwrap();
        assert!(JwtUtils::verify_access_token_with(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::encode_access_token(SECRET, 1, "admin", chrono::Duration::minutes(-10))
                .unwrap();
        assert!(JwtUtils::verify_access_token_with(&token, SECRET).is_err());
    }

    #[test]
    fn test_refresh_token_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "1".to_string(),
            role: "admin".to_string(),
            token_type: "refresh".to_string(),
            exp: now + 600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token_with(&token, SECRET).is_err());
    }
}
