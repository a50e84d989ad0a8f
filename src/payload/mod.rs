//! Turning typed field sets into the literal strings a QR code encodes.
//!
//! The `format_*` functions are total and never escape their inputs beyond
//! what each payload scheme below states. [`QrRequest`] adds the field
//! validation the generator screens perform before formatting.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

// Unreserved characters stay literal in the tweet text.
const TWEET_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const WIFI_NO_ENCRYPTION: &str = "none";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("{0} cannot be empty")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("a password is required for {0} networks")]
    MissingPassword(&'static str),
    #[error("unknown wifi security: {0} (expected none, WPA or WEP)")]
    UnknownSecurity(String),
}

pub fn format_email(address: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let mut out = format!("mailto:{}", address);
    let params: Vec<String> = [
        subject.map(|s| format!("subject={}", s)),
        body.map(|b| format!("body={}", b)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }
    out
}

pub fn format_url(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

pub fn format_sms(phone_number: &str, message: Option<&str>) -> String {
    let number = clean_phone_number(phone_number);
    match message {
        Some(message) => format!("smsto:{}:{}", number, message),
        None => format!("smsto:{}", number),
    }
}

/// Keeps digits, plus a `+` only when it precedes every kept digit.
fn clean_phone_number(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_digit() || (c == '+' && out.is_empty()) {
            out.push(c);
        }
    }
    out
}

pub fn format_twitter(value: &str, is_profile: bool) -> String {
    if is_profile {
        let handle = value.strip_prefix('@').unwrap_or(value);
        format!("https://twitter.com/{}", handle)
    } else {
        format!(
            "https://twitter.com/intent/tweet?text={}",
            utf8_percent_encode(value, TWEET_ENCODE_SET)
        )
    }
}

pub fn format_wifi(ssid: &str, password: &str, encryption_type: &str, is_hidden: bool) -> String {
    let mut out = format!("WIFI:S:{};", ssid);
    if !password.trim().is_empty() && encryption_type != WIFI_NO_ENCRYPTION {
        out.push_str(&format!("P:{};", password));
    }
    out.push_str(&format!("T:{};", encryption_type));
    if is_hidden {
        out.push_str("H:true;");
    }
    out.push(';');
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiSecurity {
    None,
    Wpa,
    Wep,
}

impl WifiSecurity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => WIFI_NO_ENCRYPTION,
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
        }
    }

    pub fn parse(input: &str) -> Result<Self, PayloadError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "none" | "nopass" | "open" => Ok(Self::None),
            "wpa" | "wpa2" => Ok(Self::Wpa),
            "wep" => Ok(Self::Wep),
            _ => Err(PayloadError::UnknownSecurity(input.trim().to_string())),
        }
    }
}

/// A request to produce one QR payload, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrRequest {
    Text(String),
    Url(String),
    Email {
        address: String,
        subject: String,
        body: String,
    },
    Sms {
        phone_number: String,
        message: String,
    },
    TwitterProfile(String),
    Tweet(String),
    Wifi {
        ssid: String,
        password: String,
        security: WifiSecurity,
        hidden: bool,
    },
    Scanned(String),
}

/// A validated payload together with the history category it is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPayload {
    pub category: &'static str,
    pub payload: String,
}

impl QrRequest {
    pub fn category(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text QR",
            Self::Url(_) => "URL QR",
            Self::Email { .. } => "Email QR",
            Self::Sms { .. } => "SMS QR",
            Self::TwitterProfile(_) => "Twitter Profile QR",
            Self::Tweet(_) => "Twitter Tweet QR",
            Self::Wifi { .. } => "WiFi QR",
            Self::Scanned(_) => "Scanned",
        }
    }

    pub fn build(&self) -> Result<GeneratedPayload, PayloadError> {
        let payload = match self {
            Self::Text(content) => {
                require(content, "text content")?;
                content.clone()
            }
            Self::Url(url) => format_url(require(url, "URL")?),
            Self::Email {
                address,
                subject,
                body,
            } => {
                let address = require(address, "email address")?;
                if !address.contains('@') || !address.contains('.') {
                    return Err(PayloadError::InvalidEmail(address.to_string()));
                }
                format_email(address, non_blank(subject), non_blank(body))
            }
            Self::Sms {
                phone_number,
                message,
            } => format_sms(require(phone_number, "phone number")?, non_blank(message)),
            Self::TwitterProfile(username) => {
                format_twitter(require(username, "Twitter username")?, true)
            }
            Self::Tweet(text) => format_twitter(require(text, "tweet text")?, false),
            Self::Wifi {
                ssid,
                password,
                security,
                hidden,
            } => {
                require(ssid, "WiFi SSID")?;
                if *security != WifiSecurity::None && password.trim().is_empty() {
                    return Err(PayloadError::MissingPassword(security.as_str()));
                }
                format_wifi(ssid, password, security.as_str(), *hidden)
            }
            Self::Scanned(text) => {
                require(text, "scanned content")?;
                text.clone()
            }
        };

        Ok(GeneratedPayload {
            category: self.category(),
            payload,
        })
    }
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, PayloadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(PayloadError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// `value` unchanged unless it is blank.
fn non_blank(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_prefix() {
        assert_eq!(format_url("example.com"), "https://example.com");
        assert_eq!(format_url("https://example.com"), "https://example.com");
        assert_eq!(format_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn email_params() {
        assert_eq!(
            format_email("a@b.com", Some("Hi"), Some("Body")),
            "mailto:a@b.com?subject=Hi&body=Body"
        );
        assert_eq!(format_email("a@b.com", None, Some("Body")), "mailto:a@b.com?body=Body");
        assert_eq!(format_email("a@b.com", None, None), "mailto:a@b.com");
        // Values are not escaped.
        assert_eq!(
            format_email("a@b.com", Some("a&b"), None),
            "mailto:a@b.com?subject=a&b"
        );
    }

    #[test]
    fn sms_cleans_number() {
        assert_eq!(
            format_sms("+1 (555) 123-4567", Some("Hello")),
            "smsto:+15551234567:Hello"
        );
        assert_eq!(format_sms("555-0100", None), "smsto:5550100");
        assert_eq!(format_sms("1+2", None), "smsto:12");
    }

    #[test]
    fn wifi_payloads() {
        assert_eq!(
            format_wifi("MyNet", "pass123", "WPA", false),
            "WIFI:S:MyNet;P:pass123;T:WPA;;"
        );
        assert_eq!(
            format_wifi("MyNet", "", "none", true),
            "WIFI:S:MyNet;T:none;H:true;;"
        );
        assert_eq!(
            format_wifi("MyNet", "secret", "none", false),
            "WIFI:S:MyNet;T:none;;"
        );
    }

    #[test]
    fn twitter_payloads() {
        assert_eq!(format_twitter("@alice", true), "https://twitter.com/alice");
        assert_eq!(format_twitter("alice", true), "https://twitter.com/alice");
        assert_eq!(
            format_twitter("hello world & more", false),
            "https://twitter.com/intent/tweet?text=hello%20world%20%26%20more"
        );
    }

    #[test]
    fn requests_validate_required_fields() {
        assert_eq!(
            QrRequest::Url("  ".into()).build(),
            Err(PayloadError::MissingField("URL"))
        );
        assert_eq!(
            QrRequest::Email {
                address: "nobody".into(),
                subject: String::new(),
                body: String::new(),
            }
            .build(),
            Err(PayloadError::InvalidEmail("nobody".into()))
        );
        assert_eq!(
            QrRequest::Wifi {
                ssid: "Home".into(),
                password: String::new(),
                security: WifiSecurity::Wpa,
                hidden: false,
            }
            .build(),
            Err(PayloadError::MissingPassword("WPA"))
        );
    }

    #[test]
    fn requests_produce_category_and_payload() {
        let generated = QrRequest::Email {
            address: "a@b.com".into(),
            subject: "Hi".into(),
            body: " ".into(),
        }
        .build()
        .expect("valid email");
        assert_eq!(generated.category, "Email QR");
        assert_eq!(generated.payload, "mailto:a@b.com?subject=Hi");

        let generated = QrRequest::Wifi {
            ssid: "Cafe".into(),
            password: String::new(),
            security: WifiSecurity::None,
            hidden: true,
        }
        .build()
        .expect("open network");
        assert_eq!(generated.category, "WiFi QR");
        assert_eq!(generated.payload, "WIFI:S:Cafe;T:none;H:true;;");

        let generated = QrRequest::TwitterProfile("@alice".into())
            .build()
            .expect("profile");
        assert_eq!(generated.category, "Twitter Profile QR");
    }

    #[test]
    fn optional_fields_are_passed_through_untrimmed() {
        let generated = QrRequest::Sms {
            phone_number: "555 0100".into(),
            message: " on my way ".into(),
        }
        .build()
        .expect("sms");
        assert_eq!(generated.payload, "smsto:5550100: on my way ");

        let generated = QrRequest::Wifi {
            ssid: "Home".into(),
            password: " pass phrase ".into(),
            security: WifiSecurity::Wpa,
            hidden: false,
        }
        .build()
        .expect("wifi");
        assert_eq!(generated.payload, "WIFI:S:Home;P: pass phrase ;T:WPA;;");
    }

    #[test]
    fn wifi_security_parsing() {
        assert_eq!(WifiSecurity::parse("wpa").unwrap(), WifiSecurity::Wpa);
        assert_eq!(WifiSecurity::parse("NONE").unwrap(), WifiSecurity::None);
        assert!(WifiSecurity::parse("wpa3-enterprise").is_err());
    }
}
