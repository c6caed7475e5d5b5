use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use shared::upload::first_image_index;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn first_image_file(file_list: &FileList) -> Option<GlooFile> {
    let files: Vec<web_sys::File> = (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .collect();
    let mime_types: Vec<String> = files.iter().map(|file| file.type_()).collect();
    first_image_index(mime_types.iter().map(String::as_str))
        .map(|index| GlooFile::from(files[index].clone()))
}

/// Page-level errors and the blocking detection-failure notice.
pub fn render_error_message(model: &Model, ctx: &Context<Model>) -> Html {
    let message = model
        .session
        .session()
        .last_error()
        .map(str::to_string)
        .or_else(|| model.error.clone());

    if let Some(error_msg) = message {
        html! {
            <div class="error-message" role="alert">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
                <button class="dismiss-btn" onclick={ctx.link().callback(|_| Msg::DismissNotice)}>
                    {"OK"}
                </button>
            </div>
        }
    } else {
        html! {}
    }
}
