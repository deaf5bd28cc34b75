use docextract::infrastructure::observability::sanitize_prompt;

#[test]
fn given_blank_prompt_when_sanitizing_then_placeholder() {
    assert_eq!(sanitize_prompt("   \n"), "[EMPTY]");
}

#[test]
fn given_short_prompt_when_sanitizing_then_unchanged() {
    assert_eq!(sanitize_prompt("Extract the invoice"), "Extract the invoice");
}

#[test]
fn given_long_prompt_when_sanitizing_then_truncated_with_total_length() {
    let prompt = "a".repeat(150);

    let sanitized = sanitize_prompt(&prompt);

    assert_eq!(sanitized, format!("{}... (150 chars total)", "a".repeat(100)));
}

#[test]
fn given_multibyte_prompt_when_truncating_then_char_boundaries_hold() {
    let sanitized = sanitize_prompt(&"é".repeat(150));

    assert!(sanitized.starts_with(&"é".repeat(100)));
    assert!(sanitized.ends_with("(150 chars total)"));
}

#[test]
fn given_credentials_when_sanitizing_then_every_value_is_redacted() {
    let sanitized =
        sanitize_prompt("Authorization: Bearer sk-live-123 url?api_key=abc&token=xyz done");

    assert_eq!(
        sanitized,
        "Authorization: Bearer [REDACTED] url?api_key=[REDACTED]&token=[REDACTED] done"
    );
}

#[test]
fn given_json_body_with_key_when_sanitizing_then_value_is_redacted() {
    assert_eq!(
        sanitize_prompt(r#"{"api_key":"sk-1","model":"m"}"#),
        r#"{"api_key":"[REDACTED]","model":"m"}"#
    );
}

#[test]
fn given_repeated_secret_when_sanitizing_then_all_occurrences_are_redacted() {
    assert_eq!(
        sanitize_prompt("password=one password=two"),
        "password=[REDACTED] password=[REDACTED]"
    );
}
