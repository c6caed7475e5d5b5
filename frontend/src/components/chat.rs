use super::super::{Model, Msg};
use shared::format::emphasis_spans;
use shared::{ChatMessage, ChatRole, SessionStatus};
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

pub fn render_chat(model: &Model, ctx: &Context<Model>) -> Html {
    let session = model.session.session();
    if session.status() != SessionStatus::Ready {
        return html! {};
    }

    let link = ctx.link();
    let waiting = session.is_awaiting_answer();
    let user_initials = model
        .profile
        .as_ref()
        .map(|p| p.initials())
        .unwrap_or_else(|| "...".to_string());

    let handle_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::ChatInput(input.value())
    });
    let handle_keydown = link.batch_callback(|e: KeyboardEvent| {
        (e.key() == "Enter").then_some(Msg::SendQuestion)
    });

    html! {
        <div class="qa-section">
            <div class="qa-header">
                <div class="qa-icon"><i class="fa-solid fa-comments"></i></div>
                <div>
                    <h3 class="card-title">{"Ask Questions"}</h3>
                    <p class="section-subtitle">{"Ask anything about the detected objects"}</p>
                </div>
            </div>

            <div class="chat-container">
                { for session.transcript().iter().map(|msg| render_message(msg, &user_initials)) }
                {
                    if waiting {
                        html! {
                            <div class="chat-message ai">
                                <div class="message-avatar ai">{"AI"}</div>
                                <div class="message-content loading-bubble">
                                    <div class="typing-indicator"><span></span><span></span><span></span></div>
                                </div>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>

            <div class="qa-input-wrapper">
                <input
                    type="text"
                    class="qa-input"
                    placeholder={ if waiting { "AI is thinking..." } else { "Ask about results..." } }
                    value={model.chat_input.clone()}
                    oninput={handle_input}
                    onkeydown={handle_keydown}
                    disabled={waiting}
                />
                <button
                    class="qa-submit"
                    onclick={link.callback(|_| Msg::SendQuestion)}
                    disabled={waiting}
                >
                    {"Send"}
                </button>
            </div>
        </div>
    }
}

fn render_message(message: &ChatMessage, user_initials: &str) -> Html {
    let role = message.role.to_string();
    let avatar = match message.role {
        ChatRole::User => user_initials.to_string(),
        ChatRole::Ai => "AI".to_string(),
    };

    html! {
        <div class={classes!("chat-message", role.clone())}>
            <div class={classes!("message-avatar", role)}>{ avatar }</div>
            <div class="message-content">
                { for emphasis_spans(&message.content).into_iter().map(|span| {
                    if span.emphasized {
                        html! { <strong>{ span.text }</strong> }
                    } else {
                        html! { <>{ span.text }</> }
                    }
                }) }
            </div>
        </div>
    }
}
