// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The registration form validator.
//!
//! Every change to one of the three inputs synchronously recomputes a
//! readiness [`Status`]. The submit control is only enabled while the status
//! is [`Status::Succeeded`]; the validator itself never re-checks the status
//! when a request is built.
//!
//! The transition table is partial: some combinations of
//! inputs (a valid email with a matching but too-short password, say) do not
//! fire any transition and the status keeps whatever value it had before.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// Passwords shorter than this never make the form ready.
pub const MIN_PASSWORD_LENGTH: usize = 7;

/// Readiness of the registration form.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not ready to submit.
    #[default]
    Loading,
    /// Ready to submit.
    Succeeded,
}

impl Status {
    pub fn is_ready(self) -> bool {
        matches!(self, Status::Succeeded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Loading => "loading",
            Status::Succeeded => "succeeded",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The raw contents of the three registration inputs.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct FieldState {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Characters matched by `\s` in a browser regular expression. Written out
/// because `regex`'s `\s` also matches U+0085, which browsers do not.
const BROWSER_WHITESPACE: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$` with the browser's `\s`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    let part = format!("[^@{BROWSER_WHITESPACE}]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("valid email regex")
});

/// Whether `value` has the shape `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Password length as counted by the browser, in UTF-16 code units.
fn password_length(password: &str) -> usize {
    password.encode_utf16().count()
}

/// The transition fired by a field state, if any. The first matching rule
/// wins; `None` means the status keeps its previous value.
pub fn transition(fields: &FieldState) -> Option<Status> {
    let FieldState {
        email,
        password,
        confirm_password,
    } = fields;
    if email.is_empty() {
        return Some(Status::Loading);
    }
    if password.is_empty() || confirm_password.is_empty() {
        return Some(Status::Loading);
    }
    if is_valid_email(email)
        && password_length(password) >= MIN_PASSWORD_LENGTH
        && password == confirm_password
    {
        return Some(Status::Succeeded);
    }
    if password != confirm_password {
        return Some(Status::Loading);
    }
    None
}

/// The status after observing `fields`, starting from `previous`.
pub fn evaluate(fields: &FieldState, previous: Status) -> Status {
    transition(fields).unwrap_or(previous)
}

/// The request handed to the dispatch collaborator on submit.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
}

impl Debug for RegistrationRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Receives registration requests. Fire and forget: the outcome is never
/// reported back to the form.
pub trait Dispatch {
    fn dispatch(&mut self, request: RegistrationRequest);
}

impl<F> Dispatch for F
where
    F: FnMut(RegistrationRequest),
{
    fn dispatch(&mut self, request: RegistrationRequest) {
        self(request)
    }
}

/// State of one registration form.
#[derive(Clone, Default, Debug)]
pub struct RegisterForm {
    fields: FieldState,
    status: Status,
    /// Whether the password inputs are shown in clear text. Not part of the
    /// readiness state machine.
    reveal_password: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldState {
        &self.fields
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.status.is_ready()
    }

    pub fn reveal_password(&self) -> bool {
        self.reveal_password
    }

    pub fn toggle_reveal(&mut self) {
        self.reveal_password = !self.reveal_password;
    }

    pub fn on_email_changed(&mut self, value: impl Into<String>) -> Status {
        self.fields.email = value.into();
        self.recompute()
    }

    pub fn on_password_changed(&mut self, value: impl Into<String>) -> Status {
        self.fields.password = value.into();
        self.recompute()
    }

    pub fn on_confirm_changed(&mut self, value: impl Into<String>) -> Status {
        self.fields.confirm_password = value.into();
        self.recompute()
    }

    fn recompute(&mut self) -> Status {
        self.status = evaluate(&self.fields, self.status);
        self.status
    }

    /// Build a request from the current email and password. The status is
    /// not consulted.
    pub fn submit(&self) -> RegistrationRequest {
        RegistrationRequest {
            email: self.fields.email.clone(),
            password: self.fields.password.clone(),
        }
    }

    /// Build a request and hand it to `dispatcher`.
    pub fn submit_to(&self, dispatcher: &mut impl Dispatch) {
        dispatcher.dispatch(self.submit());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAILS: [&str; 6] = ["", "a@b.co", "nope", "a b@c.de", "x@y.z", "@b.co"];
    const PASSWORDS: [&str; 8] = [
        "",
        "x",
        "123456",
        "1234567",
        "abcdefg",
        "abcdefgh",
        "\u{1F600}\u{1F600}\u{1F600}",
        "\u{1F600}\u{1F600}\u{1F600}\u{1F600}",
    ];

    fn fields(email: &str, password: &str, confirm: &str) -> FieldState {
        FieldState {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn all_field_states() -> Vec<FieldState> {
        let mut states = Vec::new();
        for email in EMAILS {
            for password in PASSWORDS {
                for confirm in PASSWORDS {
                    states.push(fields(email, password, confirm));
                }
            }
        }
        states
    }

    fn form_with(email: &str, password: &str, confirm: &str) -> RegisterForm {
        let mut form = RegisterForm::new();
        form.on_email_changed(email);
        form.on_password_changed(password);
        form.on_confirm_changed(confirm);
        form
    }

    #[test]
    fn test_initial_state() {
        let form = RegisterForm::new();
        assert_eq!(form.status(), Status::Loading);
        assert!(!form.can_submit());
        assert!(!form.reveal_password());
        assert_eq!(form.fields(), &FieldState::default());
    }

    #[test]
    fn test_empty_email_is_loading() {
        for fields in all_field_states() {
            if fields.email.is_empty() {
                assert_eq!(evaluate(&fields, Status::Succeeded), Status::Loading);
            }
        }
    }

    #[test]
    fn test_empty_password_is_loading() {
        for fields in all_field_states() {
            if fields.password.is_empty() || fields.confirm_password.is_empty() {
                assert_eq!(evaluate(&fields, Status::Succeeded), Status::Loading);
            }
        }
    }

    #[test]
    fn test_valid_fields_succeed() {
        for fields in all_field_states() {
            if is_valid_email(&fields.email)
                && password_length(&fields.password) >= MIN_PASSWORD_LENGTH
                && fields.password == fields.confirm_password
            {
                assert_eq!(evaluate(&fields, Status::Loading), Status::Succeeded);
            }
        }
    }

    #[test]
    fn test_mismatch_is_loading() {
        for fields in all_field_states() {
            if !fields.password.is_empty() && fields.password != fields.confirm_password {
                assert_eq!(evaluate(&fields, Status::Succeeded), Status::Loading);
            }
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        for fields in all_field_states() {
            for previous in [Status::Loading, Status::Succeeded] {
                let first = evaluate(&fields, previous);
                assert_eq!(evaluate(&fields, previous), first);
                assert_eq!(evaluate(&fields, first), first);
            }
        }
    }

    #[test]
    fn test_scenario_valid() {
        let form = form_with("a@b.co", "1234567", "1234567");
        assert_eq!(form.status(), Status::Succeeded);
        assert!(form.can_submit());
    }

    #[test]
    fn test_scenario_short_password() {
        let form = form_with("a@b.co", "123456", "123456");
        assert_ne!(form.status(), Status::Succeeded);
        assert_eq!(transition(form.fields()), None);
    }

    #[test]
    fn test_short_password_keeps_previous_status() {
        let short = fields("a@b.co", "123456", "123456");
        assert_eq!(evaluate(&short, Status::Loading), Status::Loading);
        assert_eq!(evaluate(&short, Status::Succeeded), Status::Succeeded);
    }

    #[test]
    fn test_stale_success_survives_untracked_edit() {
        let mut form = form_with("a@b.co", "1234567", "1234567");
        assert_eq!(form.status(), Status::Succeeded);
        // An invalid email with matching passwords fires no transition.
        assert_eq!(form.on_email_changed("not-an-email"), Status::Succeeded);
    }

    #[test]
    fn test_scenario_mismatch() {
        let form = form_with("a@b.co", "abcdefg", "abcdefgh");
        assert_eq!(form.status(), Status::Loading);
    }

    #[test]
    fn test_scenario_empty_email() {
        let form = form_with("", "x", "x");
        assert_eq!(form.status(), Status::Loading);
    }

    #[test]
    fn test_each_change_recomputes() {
        let mut form = RegisterForm::new();
        assert_eq!(form.on_email_changed("a@b.co"), Status::Loading);
        assert_eq!(form.on_password_changed("1234567"), Status::Loading);
        assert_eq!(form.on_confirm_changed("1234567"), Status::Succeeded);
        assert_eq!(form.on_confirm_changed("123456"), Status::Loading);
        assert_eq!(form.on_confirm_changed("1234567"), Status::Succeeded);
        assert_eq!(form.on_email_changed(""), Status::Loading);
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // Each emoji is two UTF-16 code units.
        let pw = "\u{1F600}\u{1F600}\u{1F600}\u{1F600}";
        assert_eq!(password_length(pw), 8);
        let form = form_with("a@b.co", pw, pw);
        assert_eq!(form.status(), Status::Succeeded);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(is_valid_email("a@b..c"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a@b@c.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b.co "));
        assert!(!is_valid_email("a@b\t.co"));
        assert!(!is_valid_email("a\u{feff}@b.co"));
        assert!(!is_valid_email("a\u{a0}b@c.de"));
        assert!(!is_valid_email("a@b.\u{3000}co"));
        assert!(!is_valid_email("a\u{2028}b@c.de"));
    }

    #[test]
    fn test_next_line_is_not_whitespace() {
        assert!(is_valid_email("a\u{85}b@c.de"));
        let form = form_with("a\u{85}b@c.de", "1234567", "1234567");
        assert_eq!(form.status(), Status::Succeeded);
    }

    #[test]
    fn test_submit_ignores_status() {
        let form = form_with("a@b.co", "abc", "abcd");
        assert_eq!(form.status(), Status::Loading);
        let request = form.submit();
        assert_eq!(request.email, "a@b.co");
        assert_eq!(request.password, "abc");
    }

    #[test]
    fn test_submit_to_dispatches() {
        let form = form_with("a@b.co", "1234567", "1234567");
        let mut sent: Vec<RegistrationRequest> = Vec::new();
        let mut dispatcher = |request: RegistrationRequest| sent.push(request);
        form.submit_to(&mut dispatcher);
        form.submit_to(&mut dispatcher);
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            RegistrationRequest {
                email: "a@b.co".to_string(),
                password: "1234567".to_string(),
            }
        );
        // Submitting does not change the status.
        assert_eq!(form.status(), Status::Succeeded);
    }

    #[test]
    fn test_toggle_reveal_leaves_status() {
        let mut form = form_with("a@b.co", "1234567", "1234567");
        form.toggle_reveal();
        assert!(form.reveal_password());
        assert_eq!(form.status(), Status::Succeeded);
        form.toggle_reveal();
        assert!(!form.reveal_password());
    }

    #[test]
    fn test_request_debug_hides_password() {
        let request = RegistrationRequest {
            email: "a@b.co".to_string(),
            password: "hunter22".to_string(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("a@b.co"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_status_serialize() {
        assert_eq!(
            serde_json::to_string(&Status::Succeeded).unwrap(),
            "\"succeeded\""
        );
        assert_eq!(Status::Loading.to_string(), "loading");
    }
}
