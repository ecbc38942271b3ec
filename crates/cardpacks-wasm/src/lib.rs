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

//! WASM bindings for cardpacks - drives the registration form and the card
//! table from the browser.

use wasm_bindgen::prelude::*;
use web_sys::console;

use cardpacks_core::register::Dispatch;
use cardpacks_core::register::RegisterForm;
use cardpacks_core::register::RegistrationRequest;

mod table;

pub use table::CardTableView;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"cardpacks WASM initialized".into());
}

/// Hands values to a JavaScript function as JSON strings. The first failure
/// is kept so it can be surfaced to the caller.
pub(crate) struct JsDispatch<'a> {
    callback: &'a js_sys::Function,
    error: Option<JsValue>,
}

impl<'a> JsDispatch<'a> {
    pub(crate) fn new(callback: &'a js_sys::Function) -> Self {
        Self {
            callback,
            error: None,
        }
    }

    pub(crate) fn send<T: serde::Serialize>(&mut self, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {}", e)))
            .and_then(|json| self.callback.call1(&JsValue::NULL, &JsValue::from_str(&json)));
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    pub(crate) fn finish(self) -> Result<(), JsValue> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Dispatch for JsDispatch<'_> {
    fn dispatch(&mut self, request: RegistrationRequest) {
        self.send(&request);
    }
}

/// The registration form, as seen from JavaScript.
#[wasm_bindgen(js_name = RegisterForm)]
pub struct RegisterFormView {
    form: RegisterForm,
}

#[wasm_bindgen(js_class = RegisterForm)]
impl RegisterFormView {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            form: RegisterForm::new(),
        }
    }

    /// Returns the status after the change: "loading" or "succeeded".
    #[wasm_bindgen]
    pub fn on_email_changed(&mut self, value: &str) -> String {
        self.form.on_email_changed(value).to_string()
    }

    #[wasm_bindgen]
    pub fn on_password_changed(&mut self, value: &str) -> String {
        self.form.on_password_changed(value).to_string()
    }

    #[wasm_bindgen]
    pub fn on_confirm_changed(&mut self, value: &str) -> String {
        self.form.on_confirm_changed(value).to_string()
    }

    #[wasm_bindgen]
    pub fn status(&self) -> String {
        self.form.status().to_string()
    }

    /// Whether the Register button should be enabled.
    #[wasm_bindgen]
    pub fn can_submit(&self) -> bool {
        self.form.can_submit()
    }

    #[wasm_bindgen]
    pub fn toggle_reveal(&mut self) {
        self.form.toggle_reveal();
    }

    /// The `type` attribute for both password inputs.
    #[wasm_bindgen]
    pub fn input_type(&self) -> String {
        if self.form.reveal_password() {
            "text".to_string()
        } else {
            "password".to_string()
        }
    }

    /// Pass `{"email": ..., "password": ...}` to `callback`. The status is not
    /// checked here; the page keeps the button disabled until it is ready.
    #[wasm_bindgen]
    pub fn submit(&self, callback: &js_sys::Function) -> Result<(), JsValue> {
        let mut dispatch = JsDispatch::new(callback);
        self.form.submit_to(&mut dispatch);
        dispatch.finish()
    }
}

impl Default for RegisterFormView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_view() {
        let mut view = RegisterFormView::new();
        assert_eq!(view.status(), "loading");
        assert_eq!(view.on_email_changed("a@b.co"), "loading");
        assert_eq!(view.on_password_changed("1234567"), "loading");
        assert_eq!(view.on_confirm_changed("1234567"), "succeeded");
        assert!(view.can_submit());
    }

    #[test]
    fn test_input_type() {
        let mut view = RegisterFormView::new();
        assert_eq!(view.input_type(), "password");
        view.toggle_reveal();
        assert_eq!(view.input_type(), "text");
        assert_eq!(view.status(), "loading");
    }
}
