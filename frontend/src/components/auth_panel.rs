use crate::api::MachineClient;
use shared::{LoginRequest, RegisterRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Login,
    Signup,
}

#[derive(Properties, PartialEq)]
pub struct AuthPanelProps {
    pub client: MachineClient,
    pub on_token: Callback<String>,
}

#[function_component(AuthPanel)]
pub fn auth_panel(props: &AuthPanelProps) -> Html {
    let tab = use_state(|| Tab::Login);
    let form = use_state(RegisterRequest::default);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);

    let field = |name: &'static str| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            let mut next = (*form).clone();
            match name {
                "full_name" => next.full_name = value,
                "email" => next.email = value,
                "password" => next.password = value,
                _ => next.confirm_password = value,
            }
            form.set(next);
        })
    };

    let handle_submit = {
        let tab = tab.clone();
        let form = form.clone();
        let loading = loading.clone();
        let error = error.clone();
        let notice = notice.clone();
        let client = props.client.clone();
        let on_token = props.on_token.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            error.set(None);
            notice.set(None);

            let data = (*form).clone();
            if *tab == Tab::Signup && !data.passwords_match() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            loading.set(true);
            let current_tab = *tab;
            let tab = tab.clone();
            let loading = loading.clone();
            let error = error.clone();
            let notice = notice.clone();
            let client = client.clone();
            let on_token = on_token.clone();

            spawn_local(async move {
                match current_tab {
                    Tab::Signup => match client.register(&data).await {
                        Ok(()) => {
                            log::info!("Account created for {}", data.email);
                            tab.set(Tab::Login);
                            notice.set(Some("Account created! Please log in.".to_string()));
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    },
                    Tab::Login => {
                        let body = LoginRequest { email: data.email.clone(), password: data.password.clone() };
                        match client.login(&body).await {
                            Ok(auth) => {
                                log::info!("Signed in as {}", data.email);
                                on_token.emit(auth.token);
                            }
                            Err(e) => {
                                log::error!("Login failed: {}", e);
                                error.set(Some(e.to_string()));
                            }
                        }
                    }
                }
                loading.set(false);
            });
        })
    };

    let switch_to = |target: Tab| {
        let tab = tab.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            error.set(None);
            tab.set(target);
        })
    };

    let signup = *tab == Tab::Signup;

    html! {
        <div class="auth-container">
            <div class="auth-tabs">
                <button class={classes!("auth-tab", (!signup).then_some("active"))} onclick={switch_to(Tab::Login)}>
                    {"Sign In"}
                </button>
                <button class={classes!("auth-tab", signup.then_some("active"))} onclick={switch_to(Tab::Signup)}>
                    {"Sign Up"}
                </button>
            </div>

            if let Some(message) = (*notice).clone() {
                <div class="auth-notice">{ message }</div>
            }
            if let Some(message) = (*error).clone() {
                <div class="error-message"><p>{ message }</p></div>
            }

            <form class="auth-form" onsubmit={handle_submit}>
                if signup {
                    <input type="text" name="full_name" placeholder="Full name"
                        value={form.full_name.clone()} oninput={field("full_name")} required=true />
                }
                <input type="email" name="email" placeholder="Email"
                    value={form.email.clone()} oninput={field("email")} required=true />
                <input type="password" name="password" placeholder="Password"
                    value={form.password.clone()} oninput={field("password")} required=true />
                if signup {
                    <input type="password" name="confirm_password" placeholder="Confirm password"
                        value={form.confirm_password.clone()} oninput={field("confirm_password")} required=true />
                }
                <button type="submit" class="auth-submit" disabled={*loading}>
                    {
                        if *loading {
                            html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Please wait..."}</> }
                        } else if signup {
                            html! { <>{"Create Account"}</> }
                        } else {
                            html! { <>{"Sign In"}</> }
                        }
                    }
                </button>
            </form>
        </div>
    }
}
