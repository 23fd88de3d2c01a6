pub mod auth_handler;

pub use auth_handler::{
    __path_create_user, __path_get_me, __path_issue_token, create_user, get_me, issue_token,
};
