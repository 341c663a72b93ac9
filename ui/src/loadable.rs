use dioxus::prelude::*;

use crate::server_message;

/// State of one independently fetched part of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn settle(result: &Result<T, ServerFnError>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(value) => Loadable::Ready(value.clone()),
            Err(e) => Loadable::Failed(server_message(e)),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }
}
