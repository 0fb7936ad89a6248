//! JWT 签发与校验测试

use crm_service::{
    auth::jwt::{JwtService, TokenError},
    config::SecurityConfig,
};
use secrecy::Secret;

mod common;
use common::{create_test_config, ED25519_PRIVATE_PEM, ED25519_PUBLIC_PEM};

fn security() -> SecurityConfig {
    create_test_config().security
}

fn service() -> JwtService {
    JwtService::from_config(&security()).unwrap()
}

#[test]
fn test_issue_and_verify_claims() {
    let jwt = service();
    let token = jwt.issue_at("rep@test.com", 3, "Sales Rep", 17, 1_000).unwrap();

    let claims = jwt.verify_at(&token, 1_001).unwrap();
    assert_eq!(claims.sub, "rep@test.com");
    assert_eq!(claims.org_id, 3);
    assert_eq!(claims.role, "Sales Rep");
    assert_eq!(claims.member_id, 17);
    assert_eq!(claims.iat, 1_000);
    assert_eq!(claims.exp, 1_300);
}

#[test]
fn test_verification_is_repeatable() {
    let jwt = service();
    let token = jwt.issue("admin@test.com", 1, "Admin", 1).unwrap();

    let first = jwt.verify(&token).unwrap();
    let second = jwt.verify(&token).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    let jwt = service();
    let token = jwt.issue_at("admin@test.com", 1, "Admin", 1, 1_000).unwrap();

    assert!(jwt.verify_at(&token, 1_299).is_ok());
    assert_eq!(jwt.verify_at(&token, 1_300), Err(TokenError::Expired));
    assert_eq!(jwt.verify_at(&token, 9_999), Err(TokenError::Expired));
}

/// 逐个替换签名段的每个字符，任何一处改动都必须校验失败
fn assert_signature_fully_checked(jwt: &JwtService, token: &str) {
    let signature_start = token.rfind('.').unwrap() + 1;

    for idx in signature_start..token.len() {
        let mut bytes = token.as_bytes().to_vec();
        // 'A' 与 'Q' 的高位不同，末位字符也会改变解码结果
        bytes[idx] = if bytes[idx] == b'A' { b'Q' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(
            jwt.verify(&tampered).is_err(),
            "signature change at offset {} was accepted",
            idx - signature_start
        );
    }
}

#[test]
fn test_tampered_signature_rejected() {
    let jwt = service();
    let token = jwt.issue("admin@test.com", 1, "Admin", 1).unwrap();

    assert!(jwt.verify(&token).is_ok());
    assert_signature_fully_checked(&jwt, &token);
}

#[test]
fn test_tampered_payload_rejected() {
    let jwt = service();
    let token = jwt.issue("admin@test.com", 1, "Admin", 1).unwrap();
    let other = jwt.issue("admin@test.com", 2, "Admin", 1).unwrap();

    // 拼接另一个令牌的载荷
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert_eq!(jwt.verify(&forged), Err(TokenError::BadSignature));
}

#[test]
fn test_foreign_secret_rejected() {
    let jwt = service();

    let mut foreign_security = security();
    foreign_security.jwt_secret =
        Secret::new("another-secret-key-that-is-also-32-chars-long".to_string());
    let foreign = JwtService::from_config(&foreign_security).unwrap();

    let token = foreign.issue("admin@test.com", 1, "Admin", 1).unwrap();
    assert_eq!(jwt.verify(&token), Err(TokenError::BadSignature));
}

#[test]
fn test_malformed_token_rejected() {
    let jwt = service();
    assert_eq!(jwt.verify("not-a-token"), Err(TokenError::Malformed));
    assert_eq!(jwt.verify(""), Err(TokenError::Malformed));
}

#[test]
fn test_short_secret_refused() {
    let mut short = security();
    short.jwt_secret = Secret::new("too-short".to_string());
    assert!(JwtService::from_config(&short).is_err());
}

#[test]
fn test_eddsa_round_trip() {
    let mut eddsa = security();
    eddsa.jwt_algorithm = "EdDSA".to_string();
    eddsa.jwt_private_key_pem = Some(Secret::new(ED25519_PRIVATE_PEM.to_string()));
    eddsa.jwt_public_key_pem = Some(ED25519_PUBLIC_PEM.to_string());

    let jwt = JwtService::from_config(&eddsa).unwrap();
    let token = jwt.issue_at("admin@test.com", 1, "Admin", 1, 5_000).unwrap();

    let claims = jwt.verify_at(&token, 5_001).unwrap();
    assert_eq!(claims.org_id, 1);
    assert_eq!(claims.role, "Admin");

    // HS256 服务不接受 EdDSA 令牌
    assert!(service().verify_at(&token, 5_001).is_err());

    let fresh = jwt.issue("admin@test.com", 1, "Admin", 1).unwrap();
    assert_signature_fully_checked(&jwt, &fresh);
}

#[test]
fn test_algorithm_name_is_case_insensitive() {
    let mut eddsa = security();
    eddsa.jwt_algorithm = "eddsa".to_string();
    eddsa.jwt_private_key_pem = Some(Secret::new(ED25519_PRIVATE_PEM.to_string()));
    eddsa.jwt_public_key_pem = Some(ED25519_PUBLIC_PEM.to_string());
    assert!(eddsa.uses_eddsa());

    let jwt = JwtService::from_config(&eddsa).unwrap();
    let token = jwt.issue("admin@test.com", 1, "Admin", 1).unwrap();
    assert_eq!(jwt.verify(&token).unwrap().sub, "admin@test.com");

    // 小写名称不会退回到 HMAC 密钥
    eddsa.jwt_private_key_pem = None;
    assert!(JwtService::from_config(&eddsa).is_err());
}

#[test]
fn test_eddsa_requires_keys() {
    let mut eddsa = security();
    eddsa.jwt_algorithm = "EdDSA".to_string();
    assert!(JwtService::from_config(&eddsa).is_err());
}
