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

use axum::extract::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use cardpacks_core::register::RegisterForm;
use cardpacks_core::table::SortColumn;
use cardpacks_core::types::ids::CardId;

use crate::cmd::serve::state::MutableState;
use crate::cmd::serve::state::Notice;
use crate::cmd::serve::state::ServerState;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

#[derive(Deserialize)]
pub struct RegisterPost {
    action: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm: String,
}

pub async fn register_post_handler(
    State(state): State<ServerState>,
    Form(post): Form<RegisterPost>,
) -> Redirect {
    let mut m = state.lock();
    apply_fields(&mut m.form, &post);
    match post.action.as_str() {
        "Update" => {}
        "Reveal" => m.form.toggle_reveal(),
        "Register" => {
            // The button is disabled while the form is not ready.
            if m.form.can_submit() {
                let MutableState {
                    form,
                    outbox,
                    notice,
                    ..
                } = &mut *m;
                form.submit_to(outbox);
                *notice = Some(Notice::Info(format!(
                    "Registration request sent for {}.",
                    form.fields().email
                )));
            } else {
                log::debug!("Ignoring registration while the form is not ready");
            }
        }
        "Cancel" => return Redirect::to("/cards"),
        other => log::warn!("Unknown registration action: {other}"),
    }
    Redirect::to("/register")
}

/// Replay the posted inputs as change events, in page order, for the fields
/// that differ from what the form already holds.
fn apply_fields(form: &mut RegisterForm, post: &RegisterPost) {
    if form.fields().email != post.email {
        form.on_email_changed(post.email.as_str());
    }
    if form.fields().password != post.password {
        form.on_password_changed(post.password.as_str());
    }
    if form.fields().confirm_password != post.confirm {
        form.on_confirm_changed(post.confirm.as_str());
    }
}

#[derive(Deserialize)]
pub struct CardsPost {
    action: String,
    id: Option<String>,
    column: Option<String>,
    page: Option<usize>,
    question: Option<String>,
    answer: Option<String>,
}

impl CardsPost {
    fn card_id(&self) -> Fallible<CardId> {
        self.id
            .as_deref()
            .map(CardId::new)
            .ok_or_else(|| ErrorReport::new("missing card id"))
    }
}

pub async fn cards_post_handler(
    State(state): State<ServerState>,
    Form(post): Form<CardsPost>,
) -> Redirect {
    let mut m = state.lock();
    if let Err(e) = apply_card_action(&mut m, &post) {
        log::warn!("Card action {} failed: {}", post.action, e.message());
        m.notice = Some(Notice::Error(e.message().to_string()));
    }
    Redirect::to("/cards")
}

fn apply_card_action(m: &mut MutableState, post: &CardsPost) -> Fallible<()> {
    match post.action.as_str() {
        "Sort" => {
            let column = post
                .column
                .as_deref()
                .ok_or_else(|| ErrorReport::new("missing sort column"))?;
            m.table.sort_by(SortColumn::try_from(column)?);
        }
        "Page" => {
            let page = post
                .page
                .ok_or_else(|| ErrorReport::new("missing page number"))?;
            m.table.set_page(page);
        }
        "Edit" => m.table.begin_edit(&post.card_id()?)?,
        "Save" => {
            let id = post.card_id()?;
            if !m.table.is_editing(&id) {
                return fail(format!("card {id} is not being edited"));
            }
            if let Some(question) = post.question.as_deref() {
                m.table.set_draft_question(question)?;
            }
            if let Some(answer) = post.answer.as_deref() {
                m.table.set_draft_answer(answer)?;
            }
            let update = m.table.commit_edit()?;
            m.outbox.update(update);
            m.notice = Some(Notice::Info("Card saved.".to_string()));
        }
        "Cancel" => m.table.cancel_edit(),
        "Delete" => {
            let deletion = m.table.delete(&post.card_id()?)?;
            m.outbox.delete(deletion);
            m.notice = Some(Notice::Info("Card deleted.".to_string()));
        }
        other => return fail(format!("unknown action: {other}")),
    }
    Ok(())
}
