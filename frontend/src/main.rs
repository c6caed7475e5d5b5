mod api;
mod auth;
mod components;

use api::MachineClient;
use components::auth_panel::AuthPanel;
use components::chat::render_chat;
use components::handlers;
use components::header::render_header;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::pipeline::{ChatReply, DetectionReply};
use shared::{ApiConfig, SessionStore, SortKey, SortState, UserProfile};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

/// The image handle kept by the session: the file to upload plus its preview URL.
#[derive(Clone)]
pub struct StagedFile {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

pub enum Msg {
    // Credential and profile
    TokenChanged(Option<String>),
    ProfileLoaded(UserProfile),
    AuthExpired,
    Logout,

    // Session
    FileSelected(GlooFile),
    RemoveImage,
    Detect,
    DetectionFinished(DetectionReply),
    DismissNotice,

    // Chat
    ChatInput(String),
    SendQuestion,
    AnswerReceived(ChatReply),

    // Results
    SortBy(SortKey),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct Model {
    client: MachineClient,
    profile: Option<UserProfile>,
    session: SessionStore<StagedFile>,
    sort: Option<SortState>,
    chat_input: String,
    error: Option<String>,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
}

impl Model {
    fn signed_in(&self) -> bool {
        self.client.has_token()
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = ApiConfig::from_build_env(option_env!("API_BASE_URL"));
        log::info!("Using API at {}", config.base_url);

        let mut model = Self {
            client: MachineClient::new(config, auth::load_token()),
            profile: None,
            session: SessionStore::new(),
            sort: None,
            chat_input: String::new(),
            error: None,
            is_dragging: false,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        if model.signed_in() {
            handlers::fetch_profile(ctx, model.client.clone());
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Credential and profile
            Msg::TokenChanged(token) => handlers::handle_token_changed(self, ctx, token),
            Msg::ProfileLoaded(profile) => {
                self.profile = Some(profile);
                true
            }
            Msg::AuthExpired => handlers::handle_auth_expired(self),
            Msg::Logout => handlers::handle_logout(self),

            // Session
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::RemoveImage => handlers::handle_remove_image(self),
            Msg::Detect => handlers::handle_detect(self, ctx),
            Msg::DetectionFinished(reply) => handlers::handle_detection_finished(self, ctx, reply),
            Msg::DismissNotice => {
                self.session.dismiss_error();
                self.error = None;
                true
            }

            // Chat
            Msg::ChatInput(text) => {
                self.chat_input = text;
                false
            }
            Msg::SendQuestion => handlers::handle_send_question(self, ctx),
            Msg::AnswerReceived(reply) => handlers::handle_answer_received(self, ctx, reply),

            // Results
            Msg::SortBy(key) => {
                self.sort = Some(SortState::toggle(self.sort, key));
                true
            }

            // UI states
            Msg::SetError(error) => {
                self.error = error;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if !self.signed_in() {
            let on_token = ctx.link().callback(|token: String| Msg::TokenChanged(Some(token)));
            return html! {
                <div class="container">
                    <AuthPanel client={self.client.clone()} {on_token} />
                </div>
            };
        }

        html! {
            <div class="container">
                { render_header(self.profile.as_ref(), ctx.link()) }

                <main class="main-content">
                { render_upload_section(self, ctx) }
                { render_error_message(self, ctx) }
                { render_results(self, ctx) }
                { render_chat(self, ctx) }
                </main>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
