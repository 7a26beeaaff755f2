// VibraWatch — Credential Portal
//
// Request handling for the Wi-Fi provisioning form. Routing is an explicit
// method+path table, so what the portal serves is readable in one place;
// the device layer registers exactly these routes on the embedded HTTP
// server. Handlers are pure; the one side effect (persisting saved
// credentials) runs through the CredentialStore trait in [`Outcome::commit`].

use crate::traits::CredentialStore;
use crate::types::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    WifiForm,
    WifiSave,
}

/// Everything the portal serves. Anything not listed is a 404.
pub const ROUTES: &[(Method, &str, Route)] = &[
    (Method::Get, "/wifi", Route::WifiForm),
    (Method::Post, "/wifi/save", Route::WifiSave),
];

pub fn route(method: Method, path: &str) -> Option<Route> {
    ROUTES
        .iter()
        .find(|(m, p, _)| *m == method && *p == path)
        .map(|(_, _, r)| *r)
}

/// What to answer the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/html",
            body,
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_owned(),
        }
    }

    /// The answer when new credentials could not be persisted.
    pub fn store_failure() -> Self {
        Self::text(500, "could not store credentials")
    }
}

/// Side effect a save request asks for; [`Outcome::commit`] carries it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Persist these credentials, then restart into them.
    ApplyCredentials(Credentials),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    pub action: Action,
}

/// A committed outcome: what to answer now that the action has run, and
/// whether the device should restart once the reply is on its way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub reply: Reply,
    pub restart: bool,
}

impl Outcome {
    fn reply_only(reply: Reply) -> Self {
        Self {
            reply,
            action: Action::None,
        }
    }

    /// Carry out the action against the credential store. A save that
    /// persists schedules a restart; one the store rejects downgrades the
    /// reply to a 500 so the browser sees the failure and the device keeps
    /// running on its old network.
    pub fn commit(self, store: &mut impl CredentialStore) -> Committed {
        match self.action {
            Action::None => Committed {
                reply: self.reply,
                restart: false,
            },
            Action::ApplyCredentials(creds) => match store.save(&creds) {
                Ok(()) => {
                    log::info!(
                        "Wi-Fi credentials updated (ssid \"{}\"), restart scheduled",
                        creds.ssid
                    );
                    Committed {
                        reply: self.reply,
                        restart: true,
                    }
                }
                Err(e) => {
                    log::error!("failed to persist credentials: {e:#}");
                    Committed {
                        reply: Reply::store_failure(),
                        restart: false,
                    }
                }
            },
        }
    }
}

/// The portal itself. Holds only what the form displays: the SSID the
/// firmware booted with.
#[derive(Debug, Clone)]
pub struct Portal {
    current_ssid: String,
}

impl Portal {
    pub fn new(current: &Credentials) -> Self {
        Self {
            current_ssid: current.ssid.clone(),
        }
    }

    /// Dispatch one request through the routing table.
    pub fn handle(&self, method: Method, path: &str, body: &str) -> Outcome {
        match route(method, path) {
            Some(Route::WifiForm) => Outcome::reply_only(Reply::html(self.render_form())),
            Some(Route::WifiSave) => self.save(body),
            None => Outcome::reply_only(Reply::text(404, "not found")),
        }
    }

    fn save(&self, body: &str) -> Outcome {
        let ssid = form_value(body, "ssid").unwrap_or_default();
        let pass = form_value(body, "pass").unwrap_or_default();
        if ssid.is_empty() {
            return Outcome::reply_only(Reply::text(400, "ssid must not be empty"));
        }
        Outcome {
            reply: Reply::html(SAVED_PAGE.to_owned()),
            action: Action::ApplyCredentials(Credentials::new(ssid, pass)),
        }
    }

    fn render_form(&self) -> String {
        format!(
            concat!(
                "<!DOCTYPE html><html><head><meta charset=\"UTF-8\">",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">",
                "<title>Change Wi-Fi</title>",
                "<style>",
                "body{{font-family:Arial;background:#1a1a2e;color:#fff;padding:20px}}",
                ".box{{max-width:300px;margin:50px auto;background:#16213e;padding:30px;border-radius:10px}}",
                "h2{{margin:0 0 20px;text-align:center}}",
                "input{{width:100%;padding:12px;margin:8px 0;border:none;border-radius:5px;box-sizing:border-box}}",
                "button{{width:100%;padding:12px;background:#0f3460;color:#fff;border:none;border-radius:5px;cursor:pointer;margin-top:10px}}",
                ".info{{font-size:12px;color:#888;margin-top:15px;text-align:center}}",
                "</style></head><body>",
                "<div class=\"box\">",
                "<h2>Change Wi-Fi</h2>",
                "<form action=\"/wifi/save\" method=\"POST\">",
                "<input type=\"text\" name=\"ssid\" placeholder=\"Network name\" required>",
                "<input type=\"password\" name=\"pass\" placeholder=\"Passphrase\">",
                "<button type=\"submit\">Save and restart</button>",
                "</form>",
                "<p class=\"info\">Current: {ssid}</p>",
                "</div></body></html>"
            ),
            ssid = escape_html(&self.current_ssid)
        )
    }
}

const SAVED_PAGE: &str = concat!(
    "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Change Wi-Fi</title></head>",
    "<body style=\"background:#1a1a2e\">",
    "<h2 style=\"color:#0f0;text-align:center;margin-top:100px;font-family:Arial\">",
    "Saved! Restarting...",
    "</h2></body></html>"
);

/// Extract one field from an `application/x-www-form-urlencoded` body.
/// `None` when the key is absent; an empty value is `Some("")`.
pub fn form_value(body: &str, key: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (percent_decode(k) == key).then(|| percent_decode(v))
    })
}

/// Form-flavoured percent decoding: `+` is a space, `%XX` is a byte, and a
/// broken escape passes through literally rather than killing the request.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (hex_nibble(bytes.get(i + 1)), hex_nibble(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_nibble(byte: Option<&u8>) -> Option<u8> {
    (*byte?).to_ascii_lowercase().checked_sub(b'0').and_then(|d| {
        if d < 10 {
            Some(d)
        } else {
            d.checked_sub(b'a' - b'0').filter(|d| *d < 6).map(|d| d + 10)
        }
    })
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
