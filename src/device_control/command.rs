//! ECP command paths. Builds the path segment appended to the device base URL
//! for each supported command and normalizes key names to ECP casing.

/// A single ECP command aimed at one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcpCommand {
    /// `POST /keypress/{key}`; the key is title-cased on construction
    Keypress(String),
    /// `POST /launch/{app_id}`; the id is passed through untouched
    Launch(String),
    /// `GET /query/device-info`
    DeviceInfo,
}

impl EcpCommand {
    pub fn keypress(key_name: &str) -> Self {
        EcpCommand::Keypress(title_case(key_name))
    }

    pub fn launch(app_id: &str) -> Self {
        EcpCommand::Launch(app_id.to_string())
    }

    /// The key name or app id carried by the command
    pub fn parameter(&self) -> Option<&str> {
        match self {
            EcpCommand::Keypress(key) => Some(key),
            EcpCommand::Launch(app_id) => Some(app_id),
            EcpCommand::DeviceInfo => None,
        }
    }

    /// Path relative to the device root, without a leading slash
    pub fn path(&self) -> String {
        match self {
            EcpCommand::Keypress(key) => format!("keypress/{}", key),
            EcpCommand::Launch(app_id) => format!("launch/{}", app_id),
            EcpCommand::DeviceInfo => "query/device-info".to_string(),
        }
    }
}

impl std::fmt::Display for EcpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Upper-case the first letter of every run of letters and lower-case the rest.
///
/// Anything that is not a letter (digits, spaces, punctuation) ends a word, so
/// `"volume up"` becomes `"Volume Up"` and `"volumeUp"` becomes `"Volumeup"`.
/// Word starts use titlecase rather than uppercase, so `"ßa"` becomes `"Ssa"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                push_titlecase(c, &mut out);
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Titlecase mapping for a word-initial letter.
///
/// The Latin digraphs have dedicated titlecase code points. Otherwise the
/// first char of the uppercase expansion is kept and the rest lower-cased
/// (`ß` -> `Ss`, `ﬁ` -> `Fi`). Greek vowels with iota subscript still come
/// out as a two-letter pair instead of their single titlecase form.
fn push_titlecase(c: char, out: &mut String) {
    match c {
        '\u{01C4}'..='\u{01C6}' => out.push('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => out.push('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => out.push('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => out.push('\u{01F2}'),
        _ => {
            let mut upper = c.to_uppercase();
            if let Some(first) = upper.next() {
                out.push(first);
            }
            out.extend(upper.flat_map(char::to_lowercase));
        }
    }
}
