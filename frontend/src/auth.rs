use gloo_storage::{LocalStorage, Storage};

const TOKEN_KEY: &str = "auth_token";

pub fn load_token() -> Option<String> {
    LocalStorage::get::<String>(TOKEN_KEY)
        .ok()
        .filter(|token| !token.is_empty())
}

pub fn store_token(token: &str) {
    if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
        log::error!("Failed to persist auth token: {:?}", e);
    }
}

pub fn clear_token() {
    LocalStorage::delete(TOKEN_KEY);
}
