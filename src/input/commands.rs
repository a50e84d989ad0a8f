use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{preset_color, Argb, CategoryKey, ColorError, TypeFilter, RECENT_COLOR_PICKS};
use crate::payload::{PayloadError, QrRequest, WifiSecurity};
use crate::theme::ThemeMode;

/// Separator between the fields of multi-field commands.
pub const FIELD_SEPARATOR: char = '|';

pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "text",
        aliases: &["t"],
        usage: ":text <content>",
        description: "Generate a plain text code",
    },
    CommandDef {
        name: "url",
        aliases: &["u"],
        usage: ":url <address>",
        description: "Generate a link code (https:// added when missing)",
    },
    CommandDef {
        name: "email",
        aliases: &["mail"],
        usage: ":email <address> | [subject] | [body]",
        description: "Generate a mailto code",
    },
    CommandDef {
        name: "sms",
        aliases: &[],
        usage: ":sms <phone> | [message]",
        description: "Generate an SMS code",
    },
    CommandDef {
        name: "tweet",
        aliases: &["tw"],
        usage: ":tweet <text>",
        description: "Generate a tweet intent code",
    },
    CommandDef {
        name: "profile",
        aliases: &["tp"],
        usage: ":profile <@username>",
        description: "Generate a Twitter profile code",
    },
    CommandDef {
        name: "wifi",
        aliases: &["wf"],
        usage: ":wifi <ssid> | [password] | [none|WPA|WEP] | [hidden]",
        description: "Generate a WiFi network code",
    },
    CommandDef {
        name: "scan",
        aliases: &["sc"],
        usage: ":scan <content>",
        description: "Record scanned content",
    },
    CommandDef {
        name: "fg",
        aliases: &["foreground"],
        usage: ":fg <#RRGGBB|name|1-6>",
        description: "Set the foreground color for new codes",
    },
    CommandDef {
        name: "bg",
        aliases: &["background"],
        usage: ":bg <#RRGGBB|name|1-6>",
        description: "Set the background color for new codes",
    },
    CommandDef {
        name: "colors",
        aliases: &["palette"],
        usage: ":colors [clear]",
        description: "List recent and preset colors",
    },
    CommandDef {
        name: "theme",
        aliases: &[],
        usage: ":theme [dark|light|contrast]",
        description: "Switch the interface theme",
    },
    CommandDef {
        name: "filter",
        aliases: &["f"],
        usage: ":filter <all|email|url|text|scanned|sms|twitter|wifi>",
        description: "Show only one type of code",
    },
    CommandDef {
        name: "export",
        aliases: &["x"],
        usage: ":export <file.json>",
        description: "Write the listed items to a JSON file",
    },
    CommandDef {
        name: "clear",
        aliases: &[],
        usage: ":clear",
        description: "Delete all history",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        usage: ":quit",
        description: "Quit qrkeep",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        usage: ":help",
        description: "Show help",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(QrRequest),
    Foreground(ColorChoice),
    Background(ColorChoice),
    Colors,
    ClearColors,
    /// `None` toggles between dark and light.
    Theme(Option<ThemeMode>),
    Filter(TypeFilter),
    Export(PathBuf),
    Clear,
    Help,
    Quit,
}

/// Color argument of `:fg` and `:bg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Exact(Argb),
    /// 1-based index into the recent colors.
    Recent(usize),
}

impl ColorChoice {
    /// A single digit picks a recent color, then preset names, then hex.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let input = input.trim();
        if let Ok(n) = input.parse::<usize>() {
            if input.len() == 1 && (1..=RECENT_COLOR_PICKS).contains(&n) {
                return Ok(Self::Recent(n));
            }
        }
        if let Some(color) = preset_color(input) {
            return Ok(Self::Exact(color));
        }
        Argb::parse_hex(input).map(Self::Exact)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Color(#[from] ColorError),
}

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}

/// Exact name or alias lookup.
pub fn find_command(name: &str) -> Option<&'static CommandDef> {
    let name = name.to_lowercase();
    COMMANDS
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name.as_str()))
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.trim_start();
    let (word, raw_args) = input.split_once(' ').unwrap_or((input, ""));
    let args = raw_args.trim();

    let def = find_command(word).ok_or_else(|| CommandError::Unknown(word.to_string()))?;
    let usage = || CommandError::Usage(def.usage);

    let command = match def.name {
        "text" => Command::Generate(QrRequest::Text(args.to_string())),
        "url" => Command::Generate(QrRequest::Url(args.to_string())),
        "email" => {
            let [address, subject, body] = trimmed(fields::<3>(raw_args));
            Command::Generate(QrRequest::Email {
                address,
                subject,
                body,
            })
        }
        "sms" => {
            let [phone_number, message] = trimmed(fields::<2>(raw_args));
            Command::Generate(QrRequest::Sms {
                phone_number,
                message,
            })
        }
        "tweet" => Command::Generate(QrRequest::Tweet(args.to_string())),
        "profile" => Command::Generate(QrRequest::TwitterProfile(args.to_string())),
        "wifi" => {
            let [ssid, password, security, hidden] = fields::<4>(raw_args);
            let [ssid, security, hidden] = trimmed([ssid, security, hidden]);
            let password = unpad(password).to_string();
            let security = if security.is_empty() {
                if password.is_empty() {
                    WifiSecurity::None
                } else {
                    WifiSecurity::Wpa
                }
            } else {
                WifiSecurity::parse(&security)?
            };
            let hidden = matches!(
                hidden.to_ascii_lowercase().as_str(),
                "hidden" | "h" | "yes" | "true"
            );
            Command::Generate(QrRequest::Wifi {
                ssid,
                password,
                security,
                hidden,
            })
        }
        "scan" => Command::Generate(QrRequest::Scanned(args.to_string())),
        "fg" | "bg" => {
            if args.is_empty() {
                return Err(usage());
            }
            let color = ColorChoice::parse(args)?;
            if def.name == "fg" {
                Command::Foreground(color)
            } else {
                Command::Background(color)
            }
        }
        "colors" => match args.to_ascii_lowercase().as_str() {
            "" => Command::Colors,
            "clear" => Command::ClearColors,
            _ => return Err(usage()),
        },
        "theme" => {
            if args.is_empty() {
                Command::Theme(None)
            } else {
                let mode = ThemeMode::parse(args)
                    .ok_or_else(|| CommandError::UnknownTheme(args.to_string()))?;
                Command::Theme(Some(mode))
            }
        }
        "filter" => {
            if args.is_empty() || args.eq_ignore_ascii_case("all") {
                Command::Filter(TypeFilter::ALL)
            } else {
                let key = CategoryKey::from_keyword(args)
                    .ok_or_else(|| CommandError::UnknownFilter(args.to_string()))?;
                Command::Filter(TypeFilter(Some(key)))
            }
        }
        "export" => {
            if args.is_empty() {
                return Err(usage());
            }
            Command::Export(PathBuf::from(args))
        }
        "clear" => Command::Clear,
        "help" => Command::Help,
        "quit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(command)
}

/// Splits `args` on [`FIELD_SEPARATOR`] into exactly `N` raw fields. Missing
/// fields are empty; extra separators stay in the last field.
fn fields<const N: usize>(args: &str) -> [&str; N] {
    let mut out = [""; N];
    for (slot, part) in out.iter_mut().zip(args.splitn(N, FIELD_SEPARATOR)) {
        *slot = part;
    }
    out
}

fn trimmed<const N: usize>(fields: [&str; N]) -> [String; N] {
    fields.map(|f| f.trim().to_string())
}

/// Drops the single space either side of a separator, keeping any other
/// whitespace. Passphrases may start or end with spaces.
fn unpad(field: &str) -> &str {
    let field = field.strip_prefix(' ').unwrap_or(field);
    field.strip_suffix(' ').unwrap_or(field)
}
