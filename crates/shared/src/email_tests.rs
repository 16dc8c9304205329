use super::*;

fn test_config() -> EmailConfig {
    EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: "user".to_string(),
        smtp_password: "password".to_string(),
        from_email: "test@example.com".to_string(),
        from_name: "Test".to_string(),
    }
}

#[test]
fn test_new_email_service() {
    let config = EmailConfig::default();
    let service = EmailService::new(config.clone());
    assert_eq!(service.config.smtp_host, config.smtp_host);
}

#[tokio::test]
async fn test_create_transport_with_credentials() {
    let service = EmailService::new(test_config());
    assert!(service.create_transport().is_ok());
}

#[tokio::test]
async fn test_create_transport_for_local_catcher() {
    let service = EmailService::new(EmailConfig::default());
    assert!(service.create_transport().is_ok());
}

#[test]
fn test_build_message_rejects_bad_recipient() {
    let service = EmailService::new(test_config());
    let result = service.build_message("not-an-address", VERIFICATION_SUBJECT, "body");
    assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
}

#[test]
fn test_build_message_accepts_valid_recipient() {
    let service = EmailService::new(test_config());
    assert!(
        service
            .build_message("jane@example.com", RESET_SUBJECT, "body")
            .is_ok()
    );
}

#[test]
fn test_verification_body_contains_code_and_email() {
    let body = verification_otp_body("jane@example.com", "482913");
    assert!(body.contains("jane@example.com"));
    assert!(body.contains("482913"));
    assert!(body.contains("verify your Shipsy account"));
}

#[test]
fn test_reset_body_contains_code_and_email() {
    let body = reset_otp_body("jane@example.com", "004211");
    assert!(body.contains("jane@example.com"));
    assert!(body.contains("004211"));
    assert!(body.contains("reset"));
}

#[test]
fn test_email_error_display() {
    assert_eq!(
        format!("{}", EmailError::BuildError("msg".into())),
        "Failed to build email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::SendError("msg".into())),
        "Failed to send email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::InvalidAddress("msg".into())),
        "Invalid email address: msg"
    );
}
