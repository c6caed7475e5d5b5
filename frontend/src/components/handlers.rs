use super::super::{Model, Msg, StagedFile};
use crate::api::MachineClient;
use crate::auth;
use super::utils::first_image_file;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::ClientError;
use shared::pipeline::{apply_chat, apply_detection, run_chat, run_detection, Applied, ChatReply, DetectionReply};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn handle_token_changed(model: &mut Model, ctx: &Context<Model>, token: Option<String>) -> bool {
    match &token {
        Some(token) => auth::store_token(token),
        None => auth::clear_token(),
    }
    model.client = model.client.with_token(token);
    reset_page(model);

    if model.client.has_token() {
        fetch_profile(ctx, model.client.clone());
    }
    true
}

pub fn handle_auth_expired(model: &mut Model) -> bool {
    log::warn!("Credential rejected by the backend, signing out");
    handle_logout(model)
}

pub fn handle_logout(model: &mut Model) -> bool {
    auth::clear_token();
    model.client = model.client.with_token(None);
    reset_page(model);
    true
}

fn reset_page(model: &mut Model) {
    model.profile = None;
    model.session.clear_image();
    model.sort = None;
    model.chat_input.clear();
    model.error = None;
}

pub fn fetch_profile(ctx: &Context<Model>, client: MachineClient) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match client.me().await {
            Ok(profile) => {
                log::info!("User info fetched: {}", profile.email);
                link.send_message(Msg::ProfileLoaded(profile));
            }
            Err(ClientError::AuthRequired) => link.send_message(Msg::AuthExpired),
            Err(e) => log::error!("Failed to fetch profile: {}", e),
        }
    });
}

pub fn handle_file_selected(model: &mut Model, file: GlooFile) -> bool {
    let preview_url = ObjectUrl::from(file.clone());
    let name = file.name();

    match model.session.stage_image(StagedFile { file, preview_url }) {
        Ok(()) => {
            log::info!("Staged {}", name);
            model.sort = None;
            model.chat_input.clear();
            model.error = None;
            true
        }
        Err(e) => {
            log::debug!("Ignoring selection of {}: {}", name, e);
            false
        }
    }
}

pub fn handle_remove_image(model: &mut Model) -> bool {
    model.session.clear_image();
    model.sort = None;
    model.chat_input.clear();
    model.error = None;
    true
}

pub fn handle_detect(model: &mut Model, ctx: &Context<Model>) -> bool {
    match model.session.begin_detection() {
        Ok(job) => {
            model.error = None;
            let client = model.client.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let reply = run_detection(&client, job).await;
                link.send_message(Msg::DetectionFinished(reply));
            });
            true
        }
        Err(e) => {
            log::debug!("Detect ignored: {}", e);
            false
        }
    }
}

pub fn handle_detection_finished(model: &mut Model, ctx: &Context<Model>, reply: DetectionReply) -> bool {
    match apply_detection(&mut model.session, reply) {
        Applied::Resolved => {
            model.sort = None;
            true
        }
        Applied::Failed(e) => {
            if e.is_auth() {
                ctx.link().send_message(Msg::AuthExpired);
            }
            true
        }
        Applied::Discarded => false,
    }
}

pub fn handle_send_question(model: &mut Model, ctx: &Context<Model>) -> bool {
    match model.session.submit_question(&model.chat_input) {
        Ok(job) => {
            model.chat_input.clear();
            let client = model.client.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let reply = run_chat(&client, job).await;
                link.send_message(Msg::AnswerReceived(reply));
            });
            true
        }
        Err(e) => {
            log::debug!("Question not sent: {}", e);
            false
        }
    }
}

pub fn handle_answer_received(model: &mut Model, ctx: &Context<Model>, reply: ChatReply) -> bool {
    match apply_chat(&mut model.session, reply) {
        Applied::Failed(e) if e.is_auth() => {
            ctx.link().send_message(Msg::AuthExpired);
            true
        }
        Applied::Discarded => false,
        _ => true,
    }
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(_model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(ctx, file_list);
                return true;
            }
        }
    }
    false
}

/// Stages the first image in `file_list`; a list without any image is reported.
pub fn process_file_list(ctx: &Context<Model>, file_list: FileList) {
    match first_image_file(&file_list) {
        Some(file) => ctx.link().send_message(Msg::FileSelected(file)),
        None if file_list.length() > 0 => {
            log::warn!("No image among {} dropped or pasted files", file_list.length());
            ctx.link().send_message(Msg::SetError(Some("No valid image file selected.".into())));
        }
        None => {}
    }
}
