//! Extended M3U parsing.

use supawatch_common::Channel;

const EXTINF: &str = "#EXTINF:";
const UNKNOWN_NAME: &str = "Unknown";
const UNDEFINED_GROUP: &str = "Undefined";

/// Parse the channels of an extended M3U playlist.
///
/// An `#EXTINF:` line opens a channel and the next non-empty line that is
/// not a directive supplies its stream URL. URL lines with no open channel
/// are skipped.
pub fn parse_m3u(content: &str) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut pending: Option<Channel> = None;

    for line in content.lines().map(str::trim) {
        if let Some(info) = line.strip_prefix(EXTINF) {
            pending = Some(Channel {
                name: display_name(info).unwrap_or(UNKNOWN_NAME).to_string(),
                group: attribute(info, "group-title")
                    .unwrap_or(UNDEFINED_GROUP)
                    .to_string(),
                logo: attribute(info, "tvg-logo").unwrap_or_default().to_string(),
                url: String::new(),
            });
        } else if !line.is_empty() && !line.starts_with('#') {
            if let Some(mut channel) = pending.take() {
                channel.url = line.to_string();
                channels.push(channel);
            }
        }
    }

    channels
}

/// Text after the first comma that is not inside a quoted attribute value.
fn display_name(info: &str) -> Option<&str> {
    let mut quoted = false;
    for (i, c) in info.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                let name = info[i + 1..].trim();
                return (!name.is_empty()).then_some(name);
            }
            _ => {}
        }
    }
    None
}

/// Non-empty value of `key="value"`.
fn attribute<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{key}=\"");
    let start = info.find(&needle)? + needle.len();
    let len = info[start..].find('"')?;
    let value = &info[start..start + len];
    (!value.is_empty()).then_some(value)
}
