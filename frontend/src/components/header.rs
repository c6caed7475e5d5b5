use super::super::{Model, Msg};
use shared::UserProfile;
use yew::html::Scope;
use yew::prelude::*;

/// Renders the application header with the signed-in user's menu
pub fn render_header(profile: Option<&UserProfile>, link: &Scope<Model>) -> Html {
    let (initials, name, email) = match profile {
        Some(p) => (p.initials(), p.display_name(), p.email.clone()),
        None => ("...".to_string(), "Loading...".to_string(), "Loading...".to_string()),
    };

    html! {
        <header class="app-header">
            <div class="header-content">
                <h1><i class="fa-solid fa-camera"></i> {" AI Vision Platform"}</h1>
                <div class="user-menu">
                    <div class="user-info">
                        <div class="avatar">{ initials }</div>
                        <div class="user-details">
                            <span class="user-name">{ name }</span>
                            <span class="user-email">{ email }</span>
                        </div>
                    </div>
                    <button
                        class="logout-button"
                        onclick={link.callback(|_| Msg::Logout)}
                        title="Logout"
                    >
                        <i class="fa-solid fa-sign-out-alt"></i>
                        {" Logout"}
                    </button>
                </div>
            </div>
        </header>
    }
}
