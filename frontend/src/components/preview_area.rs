use super::super::{Model, Msg};
use shared::SessionStatus;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let session = model.session.session();
    let Some(staged) = session.image() else {
        return html! {};
    };

    let link = ctx.link().clone();
    let name = staged.file.name();

    html! {
        <div id="preview-container" class="preview-container">
            <div class="preview-image-wrapper">
                <img id="actual-image-preview"
                    src={staged.preview_url.to_string()}
                    alt={name.clone()}
                    title={name} />
            </div>
            <div class="preview-actions">
                <button
                    class="action-btn detect-btn"
                    onclick={link.callback(|_| Msg::Detect)}
                    disabled={!session.can_detect()}
                >
                    { render_detect_button_content(session.status()) }
                </button>
                <button
                    class="action-btn remove-btn"
                    title="Remove this image"
                    onclick={link.callback(|_| Msg::RemoveImage)}
                >
                    <i class="fa-solid fa-trash"></i>{" Remove Image"}
                </button>
            </div>
        </div>
    }
}

fn render_detect_button_content(status: SessionStatus) -> Html {
    match status {
        SessionStatus::Detecting => html! {
            <><i class="fa-solid fa-spinner fa-spin"></i>{" Processing..."}</>
        },
        SessionStatus::DetectionFailed => html! {
            <><i class="fa-solid fa-rotate-right"></i>{" Retry Detection"}</>
        },
        SessionStatus::Ready => html! {
            <><i class="fa-solid fa-check"></i>{" Detected"}</>
        },
        _ => html! {
            <><i class="fa-solid fa-magnifying-glass"></i>{" Detect Objects"}</>
        },
    }
}
