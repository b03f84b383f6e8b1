mod login;
mod logout;

pub(crate) use login::{login, login_failed};
pub(crate) use logout::logout;
