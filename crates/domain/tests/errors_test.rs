use dns_harness_domain::{ConfigError, HarnessError, ResponderId};

#[test]
fn test_malformed_input_classification() {
    assert!(HarnessError::Decode("short header".into()).is_malformed_input());
    assert!(HarnessError::QuestionCount(2).is_malformed_input());

    assert!(!HarnessError::Timeout.is_malformed_input());
    assert!(!HarnessError::Transport("connection reset".into()).is_malformed_input());
}

#[test]
fn test_exit_code_propagates_sut_status() {
    assert_eq!(HarnessError::SutExited { code: Some(3) }.exit_code(), 3);
    assert_eq!(HarnessError::SutExited { code: None }.exit_code(), 1);
    assert_eq!(HarnessError::SutExited { code: Some(0) }.exit_code(), 1);
    assert_eq!(
        HarnessError::Bind {
            addr: "127.0.0.1:5350".into(),
            reason: "address in use".into()
        }
        .exit_code(),
        1
    );
}

#[test]
fn test_config_error_converts() {
    let err: HarnessError = ConfigError::Validation("bad".into()).into();
    assert_eq!(err.to_string(), "Configuration validation error: bad");
}

#[test]
fn test_well_known_responder_ids() {
    assert_eq!(ResponderId::udp().as_str(), "UDP Responder");
    assert_eq!(ResponderId::tcp().to_string(), "TCP Responder");
    assert_ne!(ResponderId::udp(), ResponderId::tcp());
    assert_eq!(ResponderId::from("UDP Responder"), ResponderId::udp());
}
