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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use maud::Markup;
use maud::html;

use cardpacks_core::register::RegisterForm;
use cardpacks_core::table::CardTable;
use cardpacks_core::table::EditDraft;
use cardpacks_core::table::Sort;
use cardpacks_core::table::SortColumn;
use cardpacks_core::table::SortDirection;
use cardpacks_core::types::card::MAX_RATING;
use cardpacks_core::types::card::PackCard;

use crate::cmd::serve::state::Notice;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::notice_banner;
use crate::cmd::serve::template::page_template;

pub async fn root_handler() -> Redirect {
    Redirect::to("/register")
}

pub async fn register_get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let html = {
        let mut m = state.lock();
        let notice = m.notice.take();
        page_template("Sign Up", render_register(&m.form, notice.as_ref()))
    };
    (StatusCode::OK, Html(html.into_string()))
}

pub async fn cards_get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let html = {
        let mut m = state.lock();
        let notice = m.notice.take();
        let dispatched = m.outbox.sent().len();
        page_template(
            "Cards",
            render_cards(&m.table, dispatched, notice.as_ref()),
        )
    };
    (StatusCode::OK, Html(html.into_string()))
}

fn render_register(form: &RegisterForm, notice: Option<&Notice>) -> Markup {
    let fields = form.fields();
    let status = form.status();
    let ready = form.can_submit();
    let (input_type, reveal_label) = if form.reveal_password() {
        ("text", "Hide")
    } else {
        ("password", "Show")
    };
    html! {
        div.register {
            div.title { "It-incubator" }
            div.subtitle { "Sign Up" }
            (notice_banner(notice))
            form action="/register" method="post" {
                // Implicit submission (Enter) uses the first submit button.
                button.default-action type="submit" name="action" value="Update" tabindex="-1" aria-hidden="true" {}
                label.field {
                    span { "Email" }
                    input type="email" name="email" value=(fields.email) autocomplete="off";
                }
                div.field.secret {
                    label {
                        span { "Password" }
                        input type=(input_type) name="password" value=(fields.password) autocomplete="new-password";
                    }
                    button.reveal type="submit" name="action" value="Reveal" { (reveal_label) }
                }
                div.field.secret {
                    label {
                        span { "Confirm password" }
                        input type=(input_type) name="confirm" value=(fields.confirm_password) autocomplete="new-password";
                    }
                    button.reveal type="submit" name="action" value="Reveal" { (reveal_label) }
                }
                div.footer {
                    button.cancel type="submit" name="action" value="Cancel" { "Cancel" }
                    button.check type="submit" name="action" value="Update" { "Check" }
                    button.register type="submit" name="action" value="Register" disabled[!ready] { "Register" }
                }
            }
            div.status data-status=(status.as_str()) { "Status: " (status.as_str()) }
        }
    }
}

fn render_cards(table: &CardTable, dispatched: usize, notice: Option<&Notice>) -> Markup {
    let draft = table.editing();
    html! {
        div.cards {
            (notice_banner(notice))
            table.card-table {
                thead {
                    tr {
                        @for column in SortColumn::ALL {
                            th { (sort_header(table.sort(), column)) }
                        }
                        th { "Actions" }
                    }
                }
                tbody {
                    @if table.is_empty() {
                        tr { td.empty colspan="5" { "No cards." } }
                    }
                    @for card in table.rows() {
                        @if let Some(draft) = draft.filter(|d| d.id == card.id) {
                            (edit_row(card, draft))
                        } @else {
                            (card_row(card, table.can_modify(card)))
                        }
                    }
                }
            }
            (pagination(table))
            div.footer {
                (table.len()) " cards, " (dispatched) " actions dispatched."
            }
        }
    }
}

fn sort_header(current: Option<Sort>, column: SortColumn) -> Markup {
    let marker = match current {
        Some(Sort {
            column: active,
            direction,
        }) if active == column => match direction {
            SortDirection::Ascending => " \u{25B2}",
            SortDirection::Descending => " \u{25BC}",
        },
        _ => "",
    };
    html! {
        form action="/cards" method="post" {
            input type="hidden" name="column" value=(column.as_str());
            button.sort type="submit" name="action" value="Sort" { (column.label()) (marker) }
        }
    }
}

fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "\u{2605}".repeat(filled), "\u{2606}".repeat(empty))
}

fn card_row(card: &PackCard, can_modify: bool) -> Markup {
    let rating = card.rating();
    html! {
        tr {
            th scope="row" { (card.question) }
            td { (card.answer) }
            td { (card.updated_date().to_string()) }
            td { span.rating title=(format!("{rating} / {MAX_RATING}")) { (stars(rating)) } }
            td.actions {
                @if can_modify {
                    form action="/cards" method="post" {
                        input type="hidden" name="id" value=(card.id.as_str());
                        button.delete type="submit" name="action" value="Delete" { "Delete" }
                        button.edit type="submit" name="action" value="Edit" { "Edit" }
                    }
                }
            }
        }
    }
}

fn edit_row(card: &PackCard, draft: &EditDraft) -> Markup {
    let rating = card.rating();
    html! {
        tr.editing {
            th scope="row" {
                input type="text" name="question" form="edit-form" value=(draft.question);
            }
            td {
                input type="text" name="answer" form="edit-form" value=(draft.answer);
            }
            td { (card.updated_date().to_string()) }
            td { span.rating { (stars(rating)) } }
            td.actions {
                form id="edit-form" action="/cards" method="post" {
                    input type="hidden" name="id" value=(draft.id.as_str());
                    button.save type="submit" name="action" value="Save" { "Save" }
                    button.cancel type="submit" name="action" value="Cancel" { "Cancel" }
                }
            }
        }
    }
}

fn pagination(table: &CardTable) -> Markup {
    let current = table.page();
    let count = table.page_count();
    html! {
        div.pagination {
            form action="/cards" method="post" {
                input type="hidden" name="action" value="Page";
                button type="submit" name="page" value=(current.saturating_sub(1)) disabled[current == 1] { "\u{2039}" }
                @for page in 1..=count {
                    @if page == current {
                        button.current type="submit" name="page" value=(page) { (page) }
                    } @else {
                        button type="submit" name="page" value=(page) { (page) }
                    }
                }
                button type="submit" name="page" value=(current + 1) disabled[current == count] { "\u{203A}" }
            }
        }
    }
}
